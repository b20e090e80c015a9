use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vision_auth::provider::IdentityClient;
use vision_auth::session::SessionStore;
use vision_events::EventBus;
use vision_veo::service::VideoGenerator;

use crate::config::ServerConfig;
use crate::gallery::GalleryStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session-scoped gallery of generated videos.
    pub gallery: Arc<GalleryStore>,
    /// Current-user session state.
    pub sessions: Arc<SessionStore>,
    /// Centralized event bus for session and generation events.
    pub event_bus: Arc<EventBus>,
    /// Generation flow behind its trait seam (mockable in tests).
    pub generator: Arc<dyn VideoGenerator>,
    /// Identity-provider client.
    pub identity: Arc<IdentityClient>,
    /// App-wide shutdown token; in-flight generations observe it at each
    /// suspension point.
    pub shutdown: CancellationToken,
}
