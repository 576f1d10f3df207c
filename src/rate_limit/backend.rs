//! Pluggable backend trait for rate limiting storage.
//!
//! Allows swapping the in-memory (single process) window store for an
//! external one (shared cache) when several instances sit behind a balancer.

use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Result type for rate limit operations.
pub type RateLimitResult<T> = Result<T, RateLimitError>;

/// Errors from rate limit backend operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether the request was admitted (and recorded).
    pub allowed: bool,
    /// Slots left in the current window after this check.
    pub remaining: u32,
    /// How long until a slot frees up. Only set on rejection.
    pub retry_after: Option<Duration>,
}

impl RateDecision {
    pub fn admitted(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    pub fn rejected(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after: Some(retry_after),
        }
    }
}

/// Trait for rate limit storage backends.
///
/// Implementations must be thread-safe: a check for one client is a
/// prune-count-append sequence that must not interleave with another check
/// for the same client.
#[async_trait]
pub trait RateLimitBackend: Send + Sync {
    /// Prune the client's window relative to `now`, then admit and record
    /// `now` if fewer than `max_requests` remain, otherwise reject.
    async fn check(
        &self,
        client_id: &str,
        now: Instant,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitResult<RateDecision>;

    /// Number of requests currently counted against a client.
    async fn count(&self, client_id: &str, now: Instant, window: Duration)
        -> RateLimitResult<usize>;

    /// Drop clients whose window has fully drained. Returns how many were removed.
    async fn evict_idle(&self, now: Instant, window: Duration) -> RateLimitResult<usize>;

    /// Number of distinct clients currently tracked.
    async fn tracked_clients(&self) -> RateLimitResult<usize>;
}
