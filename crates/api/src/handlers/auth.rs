//! Handlers for the auth endpoints.
//!
//! Routes:
//! - `POST /auth/sign-in`   — password sign-in via the identity provider
//! - `POST /auth/sign-up`   — account creation with display name
//! - `POST /auth/sign-out`  — clear the session (and the gallery)
//! - `GET  /auth/session`   — current session snapshot

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vision_auth::provider::Session;
use vision_core::error::CoreError;
use vision_events::StudioEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub display_name: String,
}

/// What the client sees of the current session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub signed_in: bool,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionView {
    fn signed_out() -> Self {
        Self {
            signed_in: false,
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    fn from_session(session: &Session) -> Self {
        Self {
            signed_in: true,
            email: Some(session.profile.email.clone()),
            display_name: session.profile.display_name.clone(),
            photo_url: session.profile.photo_url.clone(),
        }
    }
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let session = state
        .identity
        .sign_in(&input.email, &input.password)
        .await?;
    install_session(&state, session).await
}

/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let session = state
        .identity
        .sign_up(&input.email, &input.password, &input.display_name)
        .await?;
    install_session(&state, session).await
}

/// POST /api/v1/auth/sign-out
///
/// Clears the session and the gallery: records are session-scoped and do
/// not outlive the user who created them.
pub async fn sign_out(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.sessions.sign_out();
    state.gallery.clear().await;
    state.event_bus.publish(StudioEvent::SessionChanged {
        signed_in: false,
        display_name: None,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(DataResponse {
        data: SessionView::signed_out(),
    }))
}

/// GET /api/v1/auth/session
pub async fn session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let view = match state.sessions.current_profile() {
        Some(profile) => SessionView {
            signed_in: true,
            email: Some(profile.email),
            display_name: profile.display_name,
            photo_url: profile.photo_url,
        },
        None => SessionView::signed_out(),
    };

    Ok(Json(DataResponse { data: view }))
}

/// Install a freshly obtained session and notify subscribers.
async fn install_session(state: &AppState, session: Session) -> AppResult<Json<DataResponse<SessionView>>> {
    let view = SessionView::from_session(&session);
    state.event_bus.publish(StudioEvent::SessionChanged {
        signed_in: true,
        display_name: session.profile.display_name.clone(),
        timestamp: chrono::Utc::now(),
    });
    state.sessions.sign_in(session);

    Ok(Json(DataResponse { data: view }))
}
