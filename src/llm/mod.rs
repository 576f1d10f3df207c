//! Upstream LLM integration.

mod client;

pub use client::{
    CompletionGateway, LlmClient, LlmConfig, LlmError, LlmProvider, DEFAULT_ADVICE_PROMPT,
};
