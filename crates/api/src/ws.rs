//! WebSocket event stream.
//!
//! Clients connect to `/api/v1/ws` and receive every [`StudioEvent`] as a
//! JSON text frame. The stream is one-directional: inbound frames are not
//! read, and a client disconnect surfaces as a failed send. A connection
//! ends when the client goes away, the server begins shutdown, or the
//! subscriber falls so far behind that the broadcast channel drops it.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward bus events to a single WebSocket connection after upgrade.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4();
    tracing::info!(%conn_id, "WebSocket connected");

    let mut events = state.event_bus.subscribe();

    loop {
        let event = tokio::select! {
            () = state.shutdown.cancelled() => {
                tracing::debug!(%conn_id, "Closing WebSocket for shutdown");
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            event = events.recv() => event,
        };

        match event {
            Ok(event) => {
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(%conn_id, error = %e, "Failed to serialize event");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    tracing::debug!(%conn_id, "WebSocket send failed, client gone");
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(%conn_id, skipped, "WebSocket subscriber lagged, dropping");
                break;
            }
            Err(RecvError::Closed) => break,
        }
    }

    tracing::info!(%conn_id, "WebSocket disconnected");
}
