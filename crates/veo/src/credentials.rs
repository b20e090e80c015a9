//! Credential selection via a host-provided capability.
//!
//! The generative API needs an access key supplied out-of-band. The host
//! environment answers two questions: is a credential currently selected,
//! and can the user be prompted to select one. The broker is a trait so
//! hosts with a real picker UI can plug one in.

use async_trait::async_trait;

/// Total attempts the generation flow makes before giving up on
/// credential remediation. The second attempt runs after a selection
/// prompt; there is no third.
pub const MAX_CREDENTIAL_ATTEMPTS: u32 = 2;

/// Host capability for credential selection.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Whether a credential is currently selected.
    async fn has_selected_credential(&self) -> bool;

    /// Ask the host to prompt the user for a credential selection.
    ///
    /// Fire-and-forget: the broker does not report whether the user
    /// actually picked one. Callers re-check via
    /// [`current_credential`](Self::current_credential).
    async fn prompt_credential_selection(&self);

    /// The currently selected credential, if any.
    async fn current_credential(&self) -> Option<String>;
}

/// Broker backed by a fixed key from the server environment.
///
/// `has_selected_credential` is true exactly when the key is non-empty;
/// the selection prompt is a no-op beyond a warning, since a headless
/// server has no picker UI.
pub struct EnvCredentialBroker {
    key: Option<String>,
}

impl EnvCredentialBroker {
    pub fn new(key: Option<String>) -> Self {
        let key = key.filter(|k| !k.is_empty());
        Self { key }
    }
}

#[async_trait]
impl CredentialBroker for EnvCredentialBroker {
    async fn has_selected_credential(&self) -> bool {
        self.key.is_some()
    }

    async fn prompt_credential_selection(&self) {
        tracing::warn!("Credential selection requested but no picker is available; set VEO_API_KEY");
    }

    async fn current_credential(&self) -> Option<String> {
        self.key.clone()
    }
}
