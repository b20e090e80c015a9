//! Handler for the generation flow.
//!
//! Route:
//! - `POST /generate` — run the full re-grade flow for one source URL
//!   (auth required). The response blocks until the operation resolves;
//!   progress is observable on the event stream in the meantime.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use vision_core::error::CoreError;
use vision_core::styles::find_style;
use vision_core::types::AspectRatio;
use vision_core::video_id::extract_video_id;
use vision_events::StudioEvent;

use crate::error::{generation_error_code, AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub source_url: String,
    pub style_id: String,
    pub aspect_ratio: AspectRatio,
}

/// POST /api/v1/generate
pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<GenerateRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let style = find_style(&input.style_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown style id '{}'",
            input.style_id
        )))
    })?;

    // Reject unrecognized links up front; the generator would refuse them
    // anyway, but this keeps the 400 out of the generation error path.
    if extract_video_id(&input.source_url).is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "source_url is not a recognized video link".into(),
        )));
    }

    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        uid = %user.profile.uid,
        style_id = %style.id,
        aspect_ratio = %input.aspect_ratio.as_str(),
        "Generation requested",
    );

    state.event_bus.publish(StudioEvent::GenerationStarted {
        request_id,
        source_url: input.source_url.clone(),
        style_id: style.id.to_string(),
        timestamp: chrono::Utc::now(),
    });

    // In-flight work observes app shutdown through a child token.
    let cancel = state.shutdown.child_token();
    let result = state
        .generator
        .generate(&input.source_url, style, input.aspect_ratio, cancel)
        .await;

    match result {
        Ok(record) => {
            // Insert before publishing: a client reacting to the completed
            // event must find the record in the gallery.
            state.gallery.insert(record.clone()).await;
            state.event_bus.publish(StudioEvent::GenerationCompleted {
                request_id,
                record_id: record.id,
                timestamp: chrono::Utc::now(),
            });

            Ok(Json(DataResponse { data: record }))
        }
        Err(e) => {
            state.event_bus.publish(StudioEvent::GenerationFailed {
                request_id,
                code: generation_error_code(&e).to_string(),
                timestamp: chrono::Utc::now(),
            });
            Err(AppError::Generation(e))
        }
    }
}
