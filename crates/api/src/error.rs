use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vision_auth::provider::AuthError;
use vision_core::error::CoreError;
use vision_veo::api::VeoApiError;
use vision_veo::service::GenerationError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain error taxonomies and implements [`IntoResponse`] to
/// produce consistent `{ "error", "code" }` JSON bodies with stable codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vision-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A generation-flow error from `vision-veo`.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// An identity-provider error from `vision-auth`.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Stable error code for a generation failure.
///
/// Shared between the HTTP error body and the `generation.failed` event so
/// both surfaces agree on the code for a given failure.
pub fn generation_error_code(err: &GenerationError) -> &'static str {
    match err {
        GenerationError::InvalidSourceUrl => "VALIDATION_ERROR",
        GenerationError::ResultNotFound => "RESULT_NOT_FOUND",
        GenerationError::CredentialRetriesExhausted => "CREDENTIAL_RETRIES_EXHAUSTED",
        GenerationError::TimedOut { .. } => "GENERATION_TIMEOUT",
        GenerationError::Cancelled => "GENERATION_CANCELLED",
        GenerationError::Api(VeoApiError::CredentialRejected) => "CREDENTIAL_REJECTED",
        GenerationError::Api(VeoApiError::Quota(_)) => "QUOTA_EXCEEDED",
        GenerationError::Api(_) => "UPSTREAM_ERROR",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Generation flow errors ---
            AppError::Generation(err) => classify_generation_error(err),

            // --- Identity provider errors ---
            AppError::Auth(err) => classify_auth_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a generation failure to an HTTP status, error code, and message.
fn classify_generation_error(err: &GenerationError) -> (StatusCode, &'static str, String) {
    let code = generation_error_code(err);
    let status = match err {
        GenerationError::InvalidSourceUrl => StatusCode::BAD_REQUEST,
        GenerationError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
        GenerationError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::Api(VeoApiError::Quota(_)) => StatusCode::TOO_MANY_REQUESTS,
        // Credential problems are a server-side misconfiguration from the
        // client's point of view.
        _ => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, code, "Generation failed");
    }
    (status, code, err.to_string())
}

/// Map an identity-provider failure to an HTTP status, error code, and message.
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            err.to_string(),
        ),
        AuthError::EmailExists => (StatusCode::CONFLICT, "EMAIL_EXISTS", err.to_string()),
        AuthError::Request(e) => {
            tracing::error!(error = %e, "Identity provider unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Identity provider unreachable".to_string(),
            )
        }
        AuthError::MalformedResponse(msg) => {
            tracing::error!(error = %msg, "Malformed identity provider response");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Identity provider returned an unexpected response".to_string(),
            )
        }
        AuthError::Provider { code } => {
            tracing::warn!(provider_code = %code, "Identity provider error");
            (
                StatusCode::BAD_GATEWAY,
                "IDENTITY_PROVIDER_ERROR",
                format!("Identity provider error: {code}"),
            )
        }
    }
}
