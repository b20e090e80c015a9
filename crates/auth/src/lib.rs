//! Identity-provider client and in-memory session state.
//!
//! Authentication is delegated entirely to an external identity provider;
//! this crate holds the thin REST client for it plus the transient session
//! store the rest of the application consults ("is a user authenticated?",
//! "what is their display name/photo?").

pub mod provider;
pub mod session;
