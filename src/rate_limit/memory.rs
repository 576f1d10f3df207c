//! In-memory rate limit backend for single-process operation.
//!
//! Lock-based sliding-window store. State is not persisted across restarts.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{RateDecision, RateLimitBackend, RateLimitResult};
use super::config::DEFAULT_EVICTION_THRESHOLD;

/// Admitted request times for one client, oldest first.
#[derive(Debug, Default)]
struct ClientWindow {
    hits: VecDeque<Instant>,
}

impl ClientWindow {
    /// Drop entries that are `window` or more old relative to `now`.
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest entry leaves the window.
    fn retry_after(&self, now: Instant, window: Duration) -> Duration {
        self.hits
            .front()
            .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or(Duration::ZERO)
    }

    fn is_drained(&self, now: Instant, window: Duration) -> bool {
        self.hits
            .back()
            .map_or(true, |&newest| now.saturating_duration_since(newest) >= window)
    }
}

/// In-memory rate limit backend.
#[derive(Clone)]
pub struct InMemoryRateLimitBackend {
    clients: Arc<RwLock<HashMap<String, ClientWindow>>>,
    eviction_threshold: usize,
}

impl InMemoryRateLimitBackend {
    /// Create a new in-memory backend with the default eviction threshold.
    pub fn new() -> Self {
        Self::with_eviction_threshold(DEFAULT_EVICTION_THRESHOLD)
    }

    /// Create a new in-memory backend that sweeps drained clients once
    /// `threshold` clients are tracked.
    pub fn with_eviction_threshold(threshold: usize) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            eviction_threshold: threshold,
        }
    }
}

impl Default for InMemoryRateLimitBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitBackend for InMemoryRateLimitBackend {
    async fn check(
        &self,
        client_id: &str,
        now: Instant,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitResult<RateDecision> {
        let mut clients = self.clients.write().await;

        // Sweep before inserting so a flood of one-off clients can't grow the map forever
        if clients.len() >= self.eviction_threshold && !clients.contains_key(client_id) {
            let before = clients.len();
            clients.retain(|_, w| !w.is_drained(now, window));
            debug!(
                evicted = before - clients.len(),
                remaining = clients.len(),
                "swept idle rate limit windows"
            );
        }

        let entry = clients.entry(client_id.to_string()).or_default();
        entry.prune(now, window);

        let used = entry.hits.len();
        if used >= max_requests as usize {
            return Ok(RateDecision::rejected(entry.retry_after(now, window)));
        }

        entry.hits.push_back(now);
        Ok(RateDecision::admitted(max_requests - (used as u32) - 1))
    }

    async fn count(
        &self,
        client_id: &str,
        now: Instant,
        window: Duration,
    ) -> RateLimitResult<usize> {
        let clients = self.clients.read().await;
        Ok(clients
            .get(client_id)
            .map(|w| {
                w.hits
                    .iter()
                    .filter(|&&t| now.saturating_duration_since(t) < window)
                    .count()
            })
            .unwrap_or(0))
    }

    async fn evict_idle(&self, now: Instant, window: Duration) -> RateLimitResult<usize> {
        let mut clients = self.clients.write().await;
        let before = clients.len();
        clients.retain(|_, w| !w.is_drained(now, window));
        Ok(before - clients.len())
    }

    async fn tracked_clients(&self) -> RateLimitResult<usize> {
        Ok(self.clients.read().await.len())
    }
}
