use std::path::PathBuf;
use std::time::Duration;

/// Reference polling period: one full refresh per second.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Where the identity token lives unless configured otherwise.
const DEFAULT_IDENTITY_PATH: &str = ".crypto-alerts/identity";

/// Client configuration.
///
/// `base_url` may be empty — that is a configuration error, but it is
/// surfaced by the gateway on the first request rather than validated
/// eagerly, so a client can be constructed before its endpoint is known.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend API root, e.g. `http://192.168.0.167:8080/api`.
    pub base_url: String,

    /// Fixed period between polling ticks, for both collections.
    pub poll_interval: Duration,

    /// File the identity token is persisted to.
    pub identity_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            identity_path: PathBuf::from(DEFAULT_IDENTITY_PATH),
        }
    }
}

impl Settings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load settings from environment variables, falling back to defaults:
    /// - `CRYPTO_ALERTS_API_URL` — backend API root
    /// - `CRYPTO_ALERTS_POLL_MS` — polling period in milliseconds
    /// - `CRYPTO_ALERTS_IDENTITY_PATH` — identity token file
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let poll_interval = non_empty_var("CRYPTO_ALERTS_POLL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        Self {
            base_url: non_empty_var("CRYPTO_ALERTS_API_URL").unwrap_or(defaults.base_url),
            poll_interval,
            identity_path: non_empty_var("CRYPTO_ALERTS_IDENTITY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.identity_path),
        }
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
