//! Handler for the static style catalog.

use axum::response::IntoResponse;
use axum::Json;
use vision_core::styles::STYLE_CATALOG;

use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/styles — the fixed list of grading styles, in display order.
pub async fn list_styles() -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: STYLE_CATALOG,
    }))
}
