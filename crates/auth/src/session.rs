//! Transient session state with change notification.
//!
//! Holds the current [`Session`] (or none) behind a `tokio::sync::watch`
//! channel. Consumers either take a snapshot (`current`) or subscribe for
//! the current-user-changed notification. State is in-memory only and is
//! lost on restart.

use tokio::sync::watch;

use crate::provider::{Session, UserProfile};

/// Shared holder for the currently signed-in user.
pub struct SessionStore {
    sender: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Create an empty store (no user signed in).
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Install a new session, replacing any existing one. Notifies all
    /// subscribers.
    pub fn sign_in(&self, session: Session) {
        tracing::info!(uid = %session.profile.uid, "User signed in");
        self.sender.send_replace(Some(session));
    }

    /// Clear the session. Notifies all subscribers.
    pub fn sign_out(&self) {
        let previous = self.sender.send_replace(None);
        if let Some(session) = previous {
            tracing::info!(uid = %session.profile.uid, "User signed out");
        }
    }

    /// Whether a user is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Snapshot of the current user's profile, if signed in.
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.sender.borrow().as_ref().map(|s| s.profile.clone())
    }

    /// Snapshot of the current id token, if signed in.
    pub fn current_token(&self) -> Option<String> {
        self.sender.borrow().as_ref().map(|s| s.id_token.clone())
    }

    /// Subscribe to session changes (sign-in and sign-out).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
