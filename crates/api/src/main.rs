use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vision_api::config::ServerConfig;
use vision_api::gallery::GalleryStore;
use vision_api::router::build_app_router;
use vision_api::state::AppState;
use vision_auth::provider::IdentityClient;
use vision_auth::session::SessionStore;
use vision_events::EventBus;
use vision_veo::api::VeoApi;
use vision_veo::credentials::EnvCredentialBroker;
use vision_veo::service::GenerationService;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vision_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Shared HTTP client ---
    let http = reqwest::Client::new();

    // --- Generation service ---
    let backend = VeoApi::with_client(http.clone(), config.veo_api_url.clone());
    let broker = EnvCredentialBroker::new(config.veo_api_key.clone());
    let generator = GenerationService::new(
        backend,
        broker,
        http.clone(),
        config.image_proxy_url.clone(),
        config.poll_config(),
    );
    tracing::info!(api_url = %config.veo_api_url, "Generation service ready");

    // --- Identity provider ---
    let identity = IdentityClient::with_client(
        http,
        config.identity_api_url.clone(),
        config.identity_api_key.clone(),
    );

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // --- Shutdown token ---
    // In-flight generations poll against child tokens of this one.
    let shutdown = CancellationToken::new();

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        gallery: Arc::new(GalleryStore::new()),
        sessions: Arc::new(SessionStore::new()),
        event_bus: Arc::clone(&event_bus),
        generator: Arc::new(generator),
        identity: Arc::new(identity),
        shutdown: shutdown.clone(),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Cancelling the token as soon as the signal arrives aborts in-flight
    // generation polls and WebSocket streams, so the graceful drain below
    // is not held open by a long-running poll loop.
    let signal_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_shutdown.cancel();
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Drop the event bus sender to close the broadcast channel; any
    // remaining subscribers exit on the closed channel.
    drop(event_bus);

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
