//! Shared helpers for the HTTP integration tests.
//!
//! Builds the application router through the same [`build_app_router`]
//! used by `main.rs`, with the generation flow swapped for an in-process
//! mock so no network is touched.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use vision_api::config::ServerConfig;
use vision_api::gallery::GalleryStore;
use vision_api::router::build_app_router;
use vision_api::state::AppState;
use vision_auth::provider::{IdentityClient, UserProfile};
use vision_auth::session::SessionStore;
use vision_core::record::GeneratedVideoRecord;
use vision_core::styles::StyleOption;
use vision_core::types::AspectRatio;
use vision_events::EventBus;
use vision_veo::service::{GenerationError, VideoGenerator};

/// Build a test `ServerConfig` with safe defaults.
///
/// Upstream URLs point at a dead local port so any accidental network
/// call fails fast instead of reaching a real provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        veo_api_url: "http://127.0.0.1:9/v1beta".to_string(),
        veo_api_key: Some("test-key".to_string()),
        image_proxy_url: "http://127.0.0.1:9".to_string(),
        identity_api_url: "http://127.0.0.1:9/v1".to_string(),
        identity_api_key: "test-identity-key".to_string(),
        poll_initial_interval_secs: 10,
        poll_max_interval_secs: 60,
        poll_max_wait_secs: 1800,
    }
}

/// Application state wired for tests, with the given generator behind the
/// trait seam.
pub fn test_state(generator: Arc<dyn VideoGenerator>) -> AppState {
    let config = test_config();
    let identity = IdentityClient::new(
        config.identity_api_url.clone(),
        config.identity_api_key.clone(),
    );

    AppState {
        config: Arc::new(config),
        gallery: Arc::new(GalleryStore::new()),
        sessions: Arc::new(SessionStore::new()),
        event_bus: Arc::new(EventBus::default()),
        generator,
        identity: Arc::new(identity),
        shutdown: CancellationToken::new(),
    }
}

/// Build the full application router with all middleware layers.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

/// Install a signed-in session directly, bypassing the identity provider.
pub fn sign_in_test_user(state: &AppState) {
    state.sessions.sign_in(vision_auth::provider::Session {
        id_token: "test-id-token".to_string(),
        profile: UserProfile {
            uid: "test-uid".to_string(),
            email: "studio@example.com".to_string(),
            display_name: Some("Studio Tester".to_string()),
            photo_url: None,
        },
    });
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request");
    app.oneshot(request).await.expect("request failed")
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request");
    app.oneshot(request).await.expect("request failed")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not valid JSON")
}

/// Assert an error response shape: the given status plus `error` and
/// `code` fields, with `code` equal to `expected_code`.
pub async fn assert_error_body(
    response: Response<Body>,
    status: StatusCode,
    expected_code: &str,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert!(json["error"].is_string(), "error body missing 'error' field");
    assert_eq!(json["code"], expected_code);
    json
}

/// A [`VideoGenerator`] that returns a canned outcome and counts calls.
pub struct MockGenerator {
    outcome: Outcome,
    pub calls: AtomicU32,
}

enum Outcome {
    Success,
    Failure(fn() -> GenerationError),
}

impl MockGenerator {
    /// Succeed with a completed record for the submitted URL.
    pub fn succeeding() -> Self {
        Self {
            outcome: Outcome::Success,
            calls: AtomicU32::new(0),
        }
    }

    /// Fail every call with the error produced by `make`.
    pub fn failing(make: fn() -> GenerationError) -> Self {
        Self {
            outcome: Outcome::Failure(make),
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoGenerator for MockGenerator {
    async fn generate(
        &self,
        source_url: &str,
        style: &'static StyleOption,
        aspect_ratio: AspectRatio,
        _cancel: CancellationToken,
    ) -> Result<GeneratedVideoRecord, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Success => Ok(GeneratedVideoRecord::completed(
                "https://cdn.example/result.mp4&key=test-key".to_string(),
                format!("Cinematic grade: {}", style.name),
                source_url.to_string(),
                aspect_ratio,
            )),
            Outcome::Failure(make) => Err(make()),
        }
    }
}
