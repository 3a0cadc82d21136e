// Client configuration.
// Holds the backend base URL, request timeout, and user agent.

use std::time::Duration;

use crate::error::{HfsError, Result};

/// Production HFS backend.
pub const DEFAULT_BASE_URL: &str = "https://hfs-be.yunxiao.com";

/// Requests that take longer than this fail with a transport error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = concat!("hfs-query/", env!("CARGO_PKG_VERSION"));

/// Settings for building an [`HfsClient`](crate::hfs::HfsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a config from `HFS_BASE_URL` and `HFS_TIMEOUT_SECS`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("HFS_BASE_URL").filter(|v| !v.is_empty()) {
            config = config.with_base_url(&base_url);
        }

        if let Some(secs) = lookup("HFS_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            let secs: u64 = secs
                .parse()
                .map_err(|_| HfsError::Config(format!("HFS_TIMEOUT_SECS is not a number: {secs}")))?;
            if secs == 0 {
                return Err(HfsError::Config("HFS_TIMEOUT_SECS must be at least 1".into()));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
