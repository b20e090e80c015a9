use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A domain event published on the bus.
///
/// Serialized as tagged JSON (`{ "type": "generation.completed", ... }`)
/// so the WebSocket layer can forward events to browser clients verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StudioEvent {
    /// A user signed in or out.
    #[serde(rename = "session.changed")]
    SessionChanged {
        signed_in: bool,
        display_name: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// A generation request was accepted and submitted.
    #[serde(rename = "generation.started")]
    GenerationStarted {
        /// Correlates the started/completed/failed events of one request.
        request_id: Uuid,
        source_url: String,
        style_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A generation resolved successfully and its record entered the gallery.
    #[serde(rename = "generation.completed")]
    GenerationCompleted {
        request_id: Uuid,
        /// Id of the gallery record the request produced.
        record_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A generation failed terminally.
    #[serde(rename = "generation.failed")]
    GenerationFailed {
        request_id: Uuid,
        /// Stable error code, matching the HTTP error body's `code` field.
        code: String,
        timestamp: DateTime<Utc>,
    },
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StudioEvent`].
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// nothing durable depends on delivery.
    pub fn publish(&self, event: StudioEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
