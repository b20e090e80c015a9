//! Handler for the gallery listing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/videos — all generated records, newest first.
pub async fn list_videos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = state.gallery.list().await;
    Ok(Json(DataResponse { data: items }))
}
