//! REST client for the external identity provider.
//!
//! Wraps the three account endpoints the application needs: password
//! sign-in, sign-up (followed by a display-name profile update), and the
//! profile shape both return. Provider failures carry a machine-readable
//! code string in the error envelope; classification happens on that code,
//! not on human-readable text.

use serde::{Deserialize, Serialize};

/// A signed-in user as the rest of the application sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned stable user id.
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// A provider session: the bearer token plus the profile it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    /// Provider-issued id token, sent back on profile updates.
    pub id_token: String,
    pub profile: UserProfile,
}

/// Errors from the identity-provider boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Wrong email/password combination (any of the provider's
    /// credential-failure codes).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up attempted with an address that already has an account.
    #[error("An account with this email already exists")]
    EmailExists,

    /// A 2xx response whose body did not match the expected shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Any other provider error, carrying the raw code.
    #[error("Identity provider error: {code}")]
    Provider { code: String },
}

/// Map a provider error code to a typed [`AuthError`].
///
/// Codes may carry a trailing explanation (`"WEAK_PASSWORD : ..."`), so
/// matching is on the leading token.
pub fn classify_provider_code(code: &str) -> AuthError {
    let token = code.split_whitespace().next().unwrap_or(code);
    match token {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::EmailExists,
        _ => AuthError::Provider {
            code: code.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordSignIn<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    id_token: String,
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the identity provider's account endpoints.
pub struct IdentityClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl IdentityClient {
    /// Create a new client.
    ///
    /// * `api_url` - Base URL, e.g. `https://identitytoolkit.googleapis.com/v1`.
    /// * `api_key` - Project API key appended to every call.
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Sign an existing user in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .call(
                "accounts:signInWithPassword",
                &PasswordSignIn {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        Ok(Self::into_session(response))
    }

    /// Create a new account and set its display name.
    ///
    /// Two provider calls: `accounts:signUp` followed by a profile update
    /// carrying the display name, mirroring the sign-up flow the browser
    /// client performs.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let created = self
            .call(
                "accounts:signUp",
                &PasswordSignIn {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let updated = self
            .call(
                "accounts:update",
                &ProfileUpdate {
                    id_token: &created.id_token,
                    display_name,
                    return_secure_token: false,
                },
            )
            .await?;

        tracing::info!(uid = %created.local_id, "Account created");

        Ok(Session {
            id_token: created.id_token,
            profile: UserProfile {
                uid: created.local_id,
                email: created.email,
                display_name: updated.display_name,
                photo_url: updated.photo_url,
            },
        })
    }

    async fn call<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<AccountResponse, AuthError> {
        let response = self
            .client
            .post(format!("{}/{}", self.api_url, endpoint))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if !status.is_success() {
            let code = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));
            return Err(classify_provider_code(&code));
        }

        serde_json::from_str(&text)
            .map_err(|e| AuthError::MalformedResponse(format!("account decode failed: {e}")))
    }

    fn into_session(response: AccountResponse) -> Session {
        Session {
            id_token: response.id_token,
            profile: UserProfile {
                uid: response.local_id,
                email: response.email,
                display_name: response.display_name,
                photo_url: response.photo_url,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn credential_failure_codes_map_to_invalid_credentials() {
        assert_matches!(
            classify_provider_code("EMAIL_NOT_FOUND"),
            AuthError::InvalidCredentials
        );
        assert_matches!(
            classify_provider_code("INVALID_PASSWORD"),
            AuthError::InvalidCredentials
        );
        assert_matches!(
            classify_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn email_exists_maps_to_dedicated_variant() {
        assert_matches!(classify_provider_code("EMAIL_EXISTS"), AuthError::EmailExists);
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_matches!(
            classify_provider_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthError::Provider { code } if code == "TOO_MANY_ATTEMPTS_TRY_LATER"
        );
    }

    #[test]
    fn codes_with_trailing_explanation_match_on_leading_token() {
        assert_matches!(
            classify_provider_code("INVALID_PASSWORD : The password is invalid"),
            AuthError::InvalidCredentials
        );
    }
}
