//! Connection settings for the backend client.

use std::env;
use std::time::Duration;

/// Environment variable naming the API root, e.g. `http://host:5222/api`.
pub const BASE_URL_ENV: &str = "FIELDSERVE_API_BASE_URL";
/// Environment variable overriding the request timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "FIELDSERVE_HTTP_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:5222/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings over an explicit base URL. Trailing slashes are trimmed so
    /// path concatenation stays predictable.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Settings from the environment, falling back to the local development
    /// defaults when unset.
    pub fn from_env() -> Self {
        let base_url = match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                tracing::warn!(
                    default = DEFAULT_BASE_URL,
                    "{BASE_URL_ENV} not set, using default"
                );
                DEFAULT_BASE_URL.to_string()
            }
        };

        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self {
            timeout,
            ..Self::new(base_url)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
