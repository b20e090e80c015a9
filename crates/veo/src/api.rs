//! REST client for the generative video API.
//!
//! Wraps the two endpoints the flow needs -- long-running generation
//! submission and operation status retrieval -- using [`reqwest`], and
//! classifies provider failures into a typed error taxonomy at the API
//! boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vision_core::record::GenerationConfig;
use vision_core::types::DEFAULT_RESOLUTION;

/// Model identifier submitted with every generation request.
pub const GENERATION_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Provider error message that signals a missing or invalid API key.
///
/// Used only as a fallback when the response body carries no structured
/// error code; classification prefers `status`/`code` fields.
const CREDENTIAL_REJECTED_MARKER: &str = "Requested entity was not found";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of a generation submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub model: &'static str,
    /// Natural-language grading instruction.
    pub prompt: String,
    pub config: GenerationSettings,
    /// Optional reference image keeping the scene content stable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ReferenceImage>,
}

/// Generation tunables passed through to the provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub number_of_videos: u32,
    pub resolution: &'static str,
    pub aspect_ratio: &'static str,
}

/// Inline reference image payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    /// Base64-encoded image bytes.
    pub image_bytes: String,
    pub mime_type: &'static str,
}

impl GenerationRequest {
    /// Build a submission from a per-request [`GenerationConfig`].
    ///
    /// An empty reference-image string (thumbnail fetch degraded) is
    /// treated the same as no reference image at all.
    pub fn from_config(prompt: String, config: &GenerationConfig) -> Self {
        let image = config
            .reference_image
            .as_deref()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| ReferenceImage {
                image_bytes: bytes.to_string(),
                mime_type: "image/jpeg",
            });

        Self {
            model: GENERATION_MODEL,
            prompt,
            config: GenerationSettings {
                number_of_videos: 1,
                resolution: DEFAULT_RESOLUTION.as_str(),
                aspect_ratio: config.aspect_ratio.as_str(),
            },
            image,
        }
    }
}

/// Handle for a long-running generation job.
///
/// Returned by submission and refreshed by polling until `done` is set.
/// The result URI lives behind three optional levels; any absence on a
/// completed operation is a "result not found" condition, resolved by
/// [`Operation::result_uri`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Server-assigned operation name, e.g. `operations/abc123`.
    pub name: String,
    /// Completion flag. `false` while the job is still running.
    #[serde(default)]
    pub done: bool,
    /// Structured provider error, present when the job itself failed.
    #[serde(default)]
    pub error: Option<ErrorStatus>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// `response` payload of a completed operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generated_videos: Option<Vec<GeneratedSample>>,
}

/// One generated sample inside a completed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoResource>,
}

/// Media descriptor for one generated video.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    /// Extract the result media URI from the nested, optional response
    /// shape. Returns `None` if any level is absent.
    pub fn result_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generated_videos
            .as_ref()?
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
    }
}

/// Structured error body in the provider's envelope
/// (`{ "error": { "code", "message", "status" } }`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorStatus {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    /// Canonical status string, e.g. `NOT_FOUND`, `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorStatus,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the generative API boundary.
#[derive(Debug, thiserror::Error)]
pub enum VeoApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the supplied API credential.
    #[error("API credential missing or invalid")]
    CredentialRejected,

    /// Quota or billing limit reached.
    #[error("Quota exhausted: {0}")]
    Quota(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Any other non-2xx provider response.
    #[error("Provider error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Canonical status string when the body carried one.
        code: Option<String>,
        /// Provider error message (or raw body).
        message: String,
    },
}

/// Classify a non-2xx provider response into a [`VeoApiError`].
///
/// Prefers the structured `status`/`code` fields of the error envelope.
/// Falls back to matching the known credential-rejection message substring
/// only when the body carries no canonical status.
pub fn classify_error_body(http_status: u16, body: &str) -> VeoApiError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = envelope.error.message.unwrap_or_default();
        match envelope.error.status.as_deref() {
            Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED") => {
                return VeoApiError::CredentialRejected;
            }
            // The provider reports an unknown API key as NOT_FOUND on the
            // key entity rather than as an auth failure.
            Some("NOT_FOUND") if message.contains(CREDENTIAL_REJECTED_MARKER) => {
                return VeoApiError::CredentialRejected;
            }
            Some("RESOURCE_EXHAUSTED") => return VeoApiError::Quota(message),
            Some(code) => {
                return VeoApiError::Api {
                    status: http_status,
                    code: Some(code.to_string()),
                    message,
                };
            }
            None => {
                if message.contains(CREDENTIAL_REJECTED_MARKER) {
                    return VeoApiError::CredentialRejected;
                }
                return VeoApiError::Api {
                    status: http_status,
                    code: None,
                    message,
                };
            }
        }
    }

    // Unstructured body: substring fallback, then raw passthrough.
    if body.contains(CREDENTIAL_REJECTED_MARKER) {
        return VeoApiError::CredentialRejected;
    }
    VeoApiError::Api {
        status: http_status,
        code: None,
        message: body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Backend trait + HTTP implementation
// ---------------------------------------------------------------------------

/// The two provider calls the generation flow depends on.
///
/// Split out as a trait so the polling loop and the orchestration service
/// can be exercised against mock backends in tests.
#[async_trait]
pub trait VeoBackend: Send + Sync {
    /// Submit a generation request, returning the operation handle.
    async fn submit(&self, key: &str, request: &GenerationRequest)
        -> Result<Operation, VeoApiError>;

    /// Re-fetch the status of a previously submitted operation.
    async fn refresh(&self, key: &str, name: &str) -> Result<Operation, VeoApiError>;
}

/// HTTP client for the generative video API.
pub struct VeoApi {
    client: reqwest::Client,
    api_url: String,
}

impl VeoApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (shares the connection pool with other outbound calls).
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Turn a provider response into an [`Operation`], classifying
    /// non-2xx statuses via [`classify_error_body`].
    async fn parse_operation(response: reqwest::Response) -> Result<Operation, VeoApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if !status.is_success() {
            return Err(classify_error_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            VeoApiError::MalformedResponse(format!("operation decode failed: {e}"))
        })
    }
}

#[async_trait]
impl VeoBackend for VeoApi {
    async fn submit(
        &self,
        key: &str,
        request: &GenerationRequest,
    ) -> Result<Operation, VeoApiError> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.api_url, request.model
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", key)])
            .json(request)
            .send()
            .await?;

        let operation = Self::parse_operation(response).await?;
        tracing::info!(operation = %operation.name, "Generation request submitted");
        Ok(operation)
    }

    async fn refresh(&self, key: &str, name: &str) -> Result<Operation, VeoApiError> {
        let response = self
            .client
            .get(format!("{}/{}", self.api_url, name))
            .query(&[("key", key)])
            .send()
            .await?;

        Self::parse_operation(response).await
    }
}
