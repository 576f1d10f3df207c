//! Rate limiter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ceiling of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Default sliding window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Tracked-client count past which idle clients are swept on the next check.
pub const DEFAULT_EVICTION_THRESHOLD: usize = 1024;

/// Configuration for sliding-window rate limiting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per client within the window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Sweep drained clients once this many are tracked.
    #[serde(default = "default_eviction_threshold")]
    pub eviction_threshold: usize,
}

fn default_max_requests() -> u32 {
    DEFAULT_MAX_REQUESTS
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

fn default_eviction_threshold() -> usize {
    DEFAULT_EVICTION_THRESHOLD
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS,
            eviction_threshold: DEFAULT_EVICTION_THRESHOLD,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `RATE_LIMIT_MAX_REQUESTS`
    /// - `RATE_LIMIT_WINDOW_SECS`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(n) = val.parse() {
                self.max_requests = n;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_WINDOW_SECS") {
            if let Ok(n) = val.parse() {
                self.window_secs = n;
            }
        }
        self
    }
}
