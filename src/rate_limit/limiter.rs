//! Per-client sliding-window rate limiter.
//!
//! Provides the high-level admission API that wraps a pluggable backend.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

pub use super::config::RateLimitConfig;

use super::backend::{RateDecision, RateLimitBackend};
use super::memory::InMemoryRateLimitBackend;

/// Type alias for a shared rate limit backend.
pub type BoxedRateLimitBackend = Arc<dyn RateLimitBackend>;

/// Sliding-window rate limiter keyed by client identifier (usually an IP).
#[derive(Clone)]
pub struct RateLimiter {
    backend: BoxedRateLimitBackend,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given backend and default limits.
    pub fn new(backend: BoxedRateLimitBackend) -> Self {
        Self::with_config(backend, RateLimitConfig::default())
    }

    /// Create a new rate limiter with custom config.
    pub fn with_config(backend: BoxedRateLimitBackend, config: RateLimitConfig) -> Self {
        Self { backend, config }
    }

    /// In-memory limiter sized from `config`.
    pub fn in_memory(config: RateLimitConfig) -> Self {
        let backend = InMemoryRateLimitBackend::with_eviction_threshold(config.eviction_threshold);
        Self::with_config(Arc::new(backend), config)
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and, when admitted, record a request for `client_id` at `now`.
    ///
    /// Backend failures admit the request.
    pub async fn check(&self, client_id: &str, now: Instant) -> RateDecision {
        match self
            .backend
            .check(
                client_id,
                now,
                self.config.max_requests,
                self.config.window(),
            )
            .await
        {
            Ok(decision) => {
                if decision.allowed {
                    debug!(
                        client = client_id,
                        remaining = decision.remaining,
                        "rate limit slot granted"
                    );
                } else {
                    warn!(
                        client = client_id,
                        retry_after_secs = decision.retry_after.map(|d| d.as_secs()),
                        "rate limit exceeded"
                    );
                }
                decision
            }
            Err(e) => {
                warn!("Rate limit check failed for {}: {}", client_id, e);
                RateDecision::admitted(self.config.max_requests)
            }
        }
    }

    /// Whether a request from `client_id` at `now` is admitted.
    pub async fn allow(&self, client_id: &str, now: Instant) -> bool {
        self.check(client_id, now).await.allowed
    }

    /// Requests currently counted against `client_id`.
    pub async fn usage(&self, client_id: &str, now: Instant) -> usize {
        self.backend
            .count(client_id, now, self.config.window())
            .await
            .unwrap_or(0)
    }

    /// Forget clients with no requests inside the window.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        match self.backend.evict_idle(now, self.config.window()).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Rate limit eviction failed: {}", e);
                0
            }
        }
    }
}
