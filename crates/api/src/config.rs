use std::time::Duration;

use vision_veo::poll::PollConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the identity-provider key have defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the generative video API.
    pub veo_api_url: String,
    /// API key for the generative video API, when configured in the
    /// environment. Absent means the credential broker has nothing selected.
    pub veo_api_key: Option<String>,
    /// Base URL of the image proxy used for thumbnail retrieval.
    pub image_proxy_url: String,
    /// Base URL of the identity provider.
    pub identity_api_url: String,
    /// Project API key for the identity provider.
    pub identity_api_key: String,
    /// Delay before the first operation status re-fetch, in seconds.
    pub poll_initial_interval_secs: u64,
    /// Upper bound on the delay between re-fetches, in seconds.
    pub poll_max_interval_secs: u64,
    /// Total polling wait budget, in seconds.
    pub poll_max_wait_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                          |
    /// |------------------------------|--------------------------------------------------|
    /// | `HOST`                       | `0.0.0.0`                                        |
    /// | `PORT`                       | `3000`                                           |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`                          |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                                             |
    /// | `VEO_API_URL`                | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `VEO_API_KEY`                | *(unset)*                                        |
    /// | `IMAGE_PROXY_URL`            | `https://images.weserv.nl`                       |
    /// | `IDENTITY_API_URL`           | `https://identitytoolkit.googleapis.com/v1`      |
    /// | `IDENTITY_API_KEY`           | **required**                                     |
    /// | `POLL_INITIAL_INTERVAL_SECS` | `10`                                             |
    /// | `POLL_MAX_INTERVAL_SECS`     | `60`                                             |
    /// | `POLL_MAX_WAIT_SECS`         | `1800`                                           |
    ///
    /// # Panics
    ///
    /// Panics if `IDENTITY_API_KEY` is unset or a numeric variable fails to
    /// parse -- misconfiguration should fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let veo_api_url = std::env::var("VEO_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
        let veo_api_key = std::env::var("VEO_API_KEY").ok();

        let image_proxy_url = std::env::var("IMAGE_PROXY_URL")
            .unwrap_or_else(|_| "https://images.weserv.nl".into());

        let identity_api_url = std::env::var("IDENTITY_API_URL")
            .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".into());
        let identity_api_key = std::env::var("IDENTITY_API_KEY")
            .expect("IDENTITY_API_KEY must be set in the environment");

        let poll_initial_interval_secs: u64 = std::env::var("POLL_INITIAL_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("POLL_INITIAL_INTERVAL_SECS must be a valid u64");

        let poll_max_interval_secs: u64 = std::env::var("POLL_MAX_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("POLL_MAX_INTERVAL_SECS must be a valid u64");

        let poll_max_wait_secs: u64 = std::env::var("POLL_MAX_WAIT_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("POLL_MAX_WAIT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            veo_api_url,
            veo_api_key,
            image_proxy_url,
            identity_api_url,
            identity_api_key,
            poll_initial_interval_secs,
            poll_max_interval_secs,
            poll_max_wait_secs,
        }
    }

    /// Polling strategy derived from the poll tunables.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            initial_interval: Duration::from_secs(self.poll_initial_interval_secs),
            max_interval: Duration::from_secs(self.poll_max_interval_secs),
            max_wait: Duration::from_secs(self.poll_max_wait_secs),
            ..PollConfig::default()
        }
    }
}
