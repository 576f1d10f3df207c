//! Rate limiting for the structured-advice endpoint.
//!
//! Per-client sliding-window admission with pluggable backends:
//! - In-memory (default, ephemeral)
//! - Anything implementing [`RateLimitBackend`] (e.g. a shared cache for
//!   multi-instance deployments)

mod backend;
mod config;
mod limiter;
mod memory;

pub use backend::{RateDecision, RateLimitBackend, RateLimitError, RateLimitResult};
pub use config::{RateLimitConfig, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};
pub use limiter::{BoxedRateLimitBackend, RateLimiter};
pub use memory::InMemoryRateLimitBackend;
