//! advisor - LLM advice service.
//!
//! Proxies user messages to an upstream completion API, normalizes structured
//! advice replies, rate-limits per client, and keeps a feedback store.

pub mod advice;
pub mod cli;
pub mod config;
pub mod llm;
pub mod rate_limit;
pub mod repository;
pub mod schema;
pub mod server;
