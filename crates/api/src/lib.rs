//! HTTP surface of the Vision Studio backend.
//!
//! Exposes the auth, style-catalog, generation, gallery, and event-stream
//! endpoints the browser client consumes, plus the shared router builder
//! used by both the binary and the integration tests.

pub mod config;
pub mod error;
pub mod gallery;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
