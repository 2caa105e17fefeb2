//! Client configuration.
//!
//! Configuration is an explicit value passed into [`Client::new`](crate::Client::new);
//! there is no process-global state. [`Config::from_env`] is the thin
//! convenience factory for callers that keep their key in `FAL_KEY`.

use std::time::Duration;

/// Environment variable holding the fal API key.
pub const FAL_KEY_ENV: &str = "FAL_KEY";

/// Default base URL for queue endpoints.
pub const DEFAULT_QUEUE_BASE: &str = "https://queue.fal.run";
/// Default base URL for synchronous streaming endpoints.
pub const DEFAULT_SYNC_BASE: &str = "https://fal.run";
/// Default base URL for platform API endpoints.
pub const DEFAULT_API_BASE: &str = "https://api.fal.ai/v1";
/// Default timeout for opening and processing HTTP requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a fal [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key sent as `Authorization: Key <token>`. Requests are sent
    /// unauthenticated when absent.
    pub api_key: Option<String>,
    /// Base URL for queue endpoints (`queue.fal.run`).
    pub queue_base: String,
    /// Base URL for synchronous streaming endpoints (`fal.run`).
    pub sync_base: String,
    /// Base URL for platform API endpoints (`api.fal.ai/v1`).
    pub api_base: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            queue_base: DEFAULT_QUEUE_BASE.to_string(),
            sync_base: DEFAULT_SYNC_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Create a configuration with default base URLs and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Create a configuration reading the API key from `FAL_KEY`.
    ///
    /// The key stays `None` when the variable is unset; queue endpoints will
    /// reject unauthenticated requests, but local or proxied setups may not
    /// need a key at all.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(FAL_KEY_ENV).ok(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.queue_base, "https://queue.fal.run");
        assert_eq!(config.sync_base, "https://fal.run");
        assert_eq!(config.api_base, "https://api.fal.ai/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_new_sets_key() {
        let config = Config::new("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_key() {
        std::env::set_var(FAL_KEY_ENV, "env-key");
        let config = Config::from_env();
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        std::env::remove_var(FAL_KEY_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_without_key() {
        std::env::remove_var(FAL_KEY_ENV);
        let config = Config::from_env();
        assert_eq!(config.api_key, None);
    }
}
