//! Client for the generative video API (Veo-class).
//!
//! Provides the REST wrapper with a typed error taxonomy, the
//! backoff/budget/cancellation polling loop, thumbnail fetch-and-encode,
//! credential brokering with bounded retry, and the [`service::GenerationService`]
//! that orchestrates a full re-grade request.

pub mod api;
pub mod credentials;
pub mod poll;
pub mod service;
pub mod thumbnail;
