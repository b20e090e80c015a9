pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                     WebSocket event stream
///
/// /auth/sign-in           password sign-in (public)
/// /auth/sign-up           account creation (public)
/// /auth/sign-out          clear the session
/// /auth/session           current session snapshot
///
/// /styles                 style catalog
/// /videos                 gallery listing, newest first
/// ```
///
/// `/generate` lives in [`generation_routes`] so the router can mount it
/// outside the request-timeout layer.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/sign-up", post(handlers::auth::sign_up))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route("/auth/session", get(handlers::auth::session))
        .route("/styles", get(handlers::styles::list_styles))
        .route("/videos", get(handlers::gallery::list_videos))
}

/// Build the long-running `/api/v1` routes.
///
/// `POST /generate` blocks for the life of the upstream operation. Its
/// duration is bounded by the polling budget and the shutdown token, not
/// by the per-request timeout.
pub fn generation_routes() -> Router<AppState> {
    Router::new().route("/generate", post(handlers::generate::generate))
}
