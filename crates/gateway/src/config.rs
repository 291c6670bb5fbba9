//! Gateway configuration loaded from the environment.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

/// Production catalog service
pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the catalog service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `PAWMATCH_API_URL` and `PAWMATCH_TIMEOUT_SECS`, falling back to
    /// defaults (with a log line) when unset or unparsable.
    pub fn load() -> Self {
        let base_url = try_load("PAWMATCH_API_URL", DEFAULT_BASE_URL.to_string());
        let timeout_secs = try_load("PAWMATCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
