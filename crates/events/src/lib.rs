//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StudioEvent`]s: session
//! changes and generation lifecycle updates. It is designed to be shared
//! via `Arc<EventBus>` across the application; the WebSocket layer
//! forwards every event to connected browser clients.

mod bus;

pub use bus::{EventBus, StudioEvent};
