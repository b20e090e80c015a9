//! End-to-end generation orchestration.
//!
//! Ties the pieces together: video-ID extraction, thumbnail
//! fetch-and-encode, credential brokering, submission, polling, and result
//! resolution, producing a [`GeneratedVideoRecord`] for the gallery.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use vision_core::prompt::build_grading_prompt;
use vision_core::record::{GeneratedVideoRecord, GenerationConfig};
use vision_core::styles::StyleOption;
use vision_core::types::AspectRatio;
use vision_core::video_id::{extract_video_id, thumbnail_url};

use crate::api::{GenerationRequest, VeoApiError, VeoBackend};
use crate::credentials::{CredentialBroker, MAX_CREDENTIAL_ATTEMPTS};
use crate::poll::{run_to_completion, PollConfig, PollError};
use crate::thumbnail::fetch_thumbnail_base64;

/// Failures of the full generation flow.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The submitted URL does not contain a recognizable video ID.
    #[error("Source URL is not a recognized video link")]
    InvalidSourceUrl,

    /// The completed operation carried no result media URI at some
    /// nesting level.
    #[error("No result video URI found in the completed operation")]
    ResultNotFound,

    /// Credential selection was prompted but generation still failed with
    /// a credential rejection on the final allowed attempt.
    #[error("Credential selection exhausted after {MAX_CREDENTIAL_ATTEMPTS} attempts")]
    CredentialRetriesExhausted,

    /// The polling wait budget ran out.
    #[error("Generation timed out after {}s of polling", .waited.as_secs())]
    TimedOut { waited: std::time::Duration },

    /// The flow was cancelled at a suspension point.
    #[error("Generation was cancelled")]
    Cancelled,

    /// Any other provider/API failure, propagated unchanged.
    #[error(transparent)]
    Api(#[from] VeoApiError),
}

impl From<PollError> for GenerationError {
    fn from(e: PollError) -> Self {
        match e {
            PollError::TimedOut { waited } => GenerationError::TimedOut { waited },
            PollError::Cancelled => GenerationError::Cancelled,
            PollError::Api(api) => GenerationError::Api(api),
        }
    }
}

/// Seam for the HTTP surface (and its tests): anything that can turn a
/// source URL + style + aspect ratio into a gallery record.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(
        &self,
        source_url: &str,
        style: &'static StyleOption,
        aspect_ratio: AspectRatio,
        cancel: CancellationToken,
    ) -> Result<GeneratedVideoRecord, GenerationError>;
}

/// Orchestrates one generation request against a [`VeoBackend`].
pub struct GenerationService<B, C> {
    backend: B,
    broker: C,
    http: reqwest::Client,
    image_proxy_url: String,
    poll: PollConfig,
}

impl<B: VeoBackend, C: CredentialBroker> GenerationService<B, C> {
    pub fn new(
        backend: B,
        broker: C,
        http: reqwest::Client,
        image_proxy_url: String,
        poll: PollConfig,
    ) -> Self {
        Self {
            backend,
            broker,
            http,
            image_proxy_url,
            poll,
        }
    }

    /// Run the full flow for one source URL.
    ///
    /// Credential handling: if no credential is selected the broker is
    /// prompted once before submission; a [`VeoApiError::CredentialRejected`]
    /// during submission or polling also prompts and retries. Attempts are
    /// bounded by [`MAX_CREDENTIAL_ATTEMPTS`] -- exhaustion is reported as
    /// [`GenerationError::CredentialRetriesExhausted`], never swallowed.
    async fn run(
        &self,
        source_url: &str,
        style: &'static StyleOption,
        aspect_ratio: AspectRatio,
        cancel: CancellationToken,
    ) -> Result<GeneratedVideoRecord, GenerationError> {
        let video_id = extract_video_id(source_url).ok_or(GenerationError::InvalidSourceUrl)?;

        // Degrades to "" on failure; the request then goes out without a
        // reference image.
        let image_bytes =
            fetch_thumbnail_base64(&self.http, &self.image_proxy_url, &thumbnail_url(&video_id))
                .await;

        let config = GenerationConfig {
            aspect_ratio,
            style_prompt: style.prompt.to_string(),
            reference_image: Some(image_bytes),
        };
        let request =
            GenerationRequest::from_config(build_grading_prompt(&config.style_prompt), &config);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            if attempt > MAX_CREDENTIAL_ATTEMPTS {
                return Err(GenerationError::CredentialRetriesExhausted);
            }

            if !self.broker.has_selected_credential().await {
                self.broker.prompt_credential_selection().await;
            }
            let Some(key) = self.broker.current_credential().await else {
                // Still nothing selected after the prompt; burn the attempt.
                continue;
            };

            let submitted = match self.backend.submit(&key, &request).await {
                Ok(operation) => operation,
                Err(VeoApiError::CredentialRejected) => {
                    tracing::warn!(attempt, "Credential rejected at submission, re-prompting");
                    self.broker.prompt_credential_selection().await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let completed =
                match run_to_completion(&self.backend, &key, submitted, &self.poll, &cancel).await
                {
                    Ok(operation) => operation,
                    Err(PollError::Api(VeoApiError::CredentialRejected)) => {
                        tracing::warn!(attempt, "Credential rejected mid-poll, re-prompting");
                        self.broker.prompt_credential_selection().await;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

            let uri = completed
                .result_uri()
                .ok_or(GenerationError::ResultNotFound)?;

            // The provider requires the key on direct media downloads.
            let url = format!("{uri}&key={key}");

            return Ok(GeneratedVideoRecord::completed(
                url,
                format!("Cinematic grade: {}", style.name),
                source_url.to_string(),
                aspect_ratio,
            ));
        }
    }
}

#[async_trait]
impl<B: VeoBackend, C: CredentialBroker> VideoGenerator for GenerationService<B, C> {
    async fn generate(
        &self,
        source_url: &str,
        style: &'static StyleOption,
        aspect_ratio: AspectRatio,
        cancel: CancellationToken,
    ) -> Result<GeneratedVideoRecord, GenerationError> {
        self.run(source_url, style, aspect_ratio, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use assert_matches::assert_matches;

    use super::*;
    use crate::api::Operation;
    use vision_core::styles::find_style;
    use vision_core::types::GenerationStatus;

    /// Proxy URL nothing listens on, so thumbnail fetch degrades to "".
    const DEAD_PROXY: &str = "http://127.0.0.1:9/";

    fn pending() -> Operation {
        serde_json::from_str(r#"{ "name": "operations/op-1", "done": false }"#).unwrap()
    }

    /// Backend that completes with a fixed URI after N refreshes.
    struct HappyBackend {
        polls_needed: u32,
        polls_seen: AtomicU32,
    }

    #[async_trait]
    impl VeoBackend for HappyBackend {
        async fn submit(
            &self,
            _key: &str,
            _request: &GenerationRequest,
        ) -> Result<Operation, VeoApiError> {
            Ok(pending())
        }

        async fn refresh(&self, _key: &str, name: &str) -> Result<Operation, VeoApiError> {
            let seen = self.polls_seen.fetch_add(1, Ordering::SeqCst) + 1;
            let body = if seen >= self.polls_needed {
                format!(
                    r#"{{ "name": "{name}", "done": true,
                         "response": {{ "generatedVideos": [
                             {{ "video": {{ "uri": "https://cdn.example/video.mp4" }} }}
                         ] }} }}"#
                )
            } else {
                format!(r#"{{ "name": "{name}", "done": false }}"#)
            };
            Ok(serde_json::from_str(&body).unwrap())
        }
    }

    /// Backend whose submission always fails with a fixed error.
    struct RejectingBackend {
        rejected: bool,
    }

    #[async_trait]
    impl VeoBackend for RejectingBackend {
        async fn submit(
            &self,
            _key: &str,
            _request: &GenerationRequest,
        ) -> Result<Operation, VeoApiError> {
            if self.rejected {
                Err(VeoApiError::CredentialRejected)
            } else {
                Err(VeoApiError::Api {
                    status: 500,
                    code: None,
                    message: "upstream exploded".into(),
                })
            }
        }

        async fn refresh(&self, _key: &str, _name: &str) -> Result<Operation, VeoApiError> {
            unreachable!("submission never succeeds")
        }
    }

    /// Broker that counts selection prompts.
    struct CountingBroker {
        key: Option<String>,
        prompts: AtomicU32,
    }

    impl CountingBroker {
        fn with_key(key: &str) -> Self {
            Self {
                key: Some(key.to_string()),
                prompts: AtomicU32::new(0),
            }
        }

        fn without_key() -> Self {
            Self {
                key: None,
                prompts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialBroker for CountingBroker {
        async fn has_selected_credential(&self) -> bool {
            self.key.is_some()
        }

        async fn prompt_credential_selection(&self) {
            self.prompts.fetch_add(1, Ordering::SeqCst);
        }

        async fn current_credential(&self) -> Option<String> {
            self.key.clone()
        }
    }

    fn service<B: VeoBackend, C: CredentialBroker>(
        backend: B,
        broker: C,
    ) -> GenerationService<B, C> {
        GenerationService::new(
            backend,
            broker,
            reqwest::Client::new(),
            DEAD_PROXY.to_string(),
            PollConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_two_polls_appends_key() {
        let svc = service(
            HappyBackend {
                polls_needed: 2,
                polls_seen: AtomicU32::new(0),
            },
            CountingBroker::with_key("secret-key"),
        );
        let style = find_style("noir").unwrap();

        let record = svc
            .generate(
                "https://youtu.be/abc12345678",
                style,
                AspectRatio::Widescreen,
                CancellationToken::new(),
            )
            .await
            .expect("generation should succeed");

        assert_eq!(record.url, "https://cdn.example/video.mp4&key=secret-key");
        assert_eq!(record.aspect_ratio, AspectRatio::Widescreen);
        assert_eq!(record.status, GenerationStatus::Completed);
        assert_eq!(record.source_url, "https://youtu.be/abc12345678");
        assert_eq!(record.prompt, "Cinematic grade: Noir");
        assert_eq!(svc.backend.polls_seen.load(Ordering::SeqCst), 2);
        // A selected credential means no prompt was needed.
        assert_eq!(svc.broker.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_source_url_fails_before_submission() {
        let svc = service(
            RejectingBackend { rejected: true },
            CountingBroker::with_key("k"),
        );
        let style = find_style("noir").unwrap();

        let result = svc
            .generate(
                "https://example.com/not-a-video",
                style,
                AspectRatio::Widescreen,
                CancellationToken::new(),
            )
            .await;

        assert_matches!(result, Err(GenerationError::InvalidSourceUrl));
        assert_eq!(svc.broker.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn credential_rejection_prompts_and_exhausts() {
        let svc = service(
            RejectingBackend { rejected: true },
            CountingBroker::with_key("stale-key"),
        );
        let style = find_style("hollywood").unwrap();

        let result = svc
            .generate(
                "https://youtu.be/abc12345678",
                style,
                AspectRatio::Portrait,
                CancellationToken::new(),
            )
            .await;

        assert_matches!(result, Err(GenerationError::CredentialRetriesExhausted));
        // One prompt per rejected attempt.
        assert_eq!(svc.broker.prompts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_credential_error_propagates_without_prompting() {
        let svc = service(
            RejectingBackend { rejected: false },
            CountingBroker::with_key("k"),
        );
        let style = find_style("vintage").unwrap();

        let result = svc
            .generate(
                "https://youtu.be/abc12345678",
                style,
                AspectRatio::Widescreen,
                CancellationToken::new(),
            )
            .await;

        assert_matches!(
            result,
            Err(GenerationError::Api(VeoApiError::Api { status: 500, .. }))
        );
        assert_eq!(svc.broker.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_prompts_then_exhausts() {
        let svc = service(
            HappyBackend {
                polls_needed: 1,
                polls_seen: AtomicU32::new(0),
            },
            CountingBroker::without_key(),
        );
        let style = find_style("dreamy").unwrap();

        let result = svc
            .generate(
                "https://youtu.be/abc12345678",
                style,
                AspectRatio::Widescreen,
                CancellationToken::new(),
            )
            .await;

        assert_matches!(result, Err(GenerationError::CredentialRetriesExhausted));
        assert_eq!(svc.broker.prompts.load(Ordering::SeqCst), 2);
        // Without a credential nothing is ever submitted.
        assert_eq!(svc.backend.polls_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_operation_without_uri_is_result_not_found() {
        struct NoUriBackend;

        #[async_trait]
        impl VeoBackend for NoUriBackend {
            async fn submit(
                &self,
                _key: &str,
                _request: &GenerationRequest,
            ) -> Result<Operation, VeoApiError> {
                Ok(pending())
            }

            async fn refresh(&self, _key: &str, name: &str) -> Result<Operation, VeoApiError> {
                let body =
                    format!(r#"{{ "name": "{name}", "done": true, "response": {{}} }}"#);
                Ok(serde_json::from_str(&body).unwrap())
            }
        }

        let svc = service(NoUriBackend, CountingBroker::with_key("k"));
        let style = find_style("noir").unwrap();

        let result = svc
            .generate(
                "https://youtu.be/abc12345678",
                style,
                AspectRatio::Widescreen,
                CancellationToken::new(),
            )
            .await;

        assert_matches!(result, Err(GenerationError::ResultNotFound));
    }
}
