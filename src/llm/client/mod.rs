//! LLM client for chat replies and structured advice.
//!
//! Supports OpenAI-compatible APIs (OpenAI, Groq, Together.ai) and Ollama.

mod config;
mod prompts;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::{LlmConfig, LlmProvider};
pub use prompts::DEFAULT_ADVICE_PROMPT;

/// Errors that can occur during LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Failed to connect to LLM service (includes timeouts)
    #[error("Connection error: {0}")]
    Connection(String),
    /// API returned a non-success status
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response had no choices or no content
    #[error("Empty response from model")]
    EmptyResponse,
    /// OpenAI-compatible provider configured without a key
    #[error("No API key configured (set LLM_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

/// A completion backend: system prompt plus user message in, text out.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send one exchange and return the trimmed text of the first choice.
    async fn complete(&self, system: Option<&str>, user: &str) -> Result<String, LlmError>;

    /// Model identifier reported in logs and `/api/info`.
    fn model(&self) -> &str;
}

/// LLM client backed by an HTTP completion API.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Chat message (shared by both providers).
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible API request format.
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// OpenAI-compatible API response format.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Ollama chat API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn messages<'a>(system: Option<&'a str>, user: &'a str) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });
        messages
    }

    /// Call an OpenAI-compatible chat completions API.
    async fn call_openai(&self, system: Option<&str>, user: &str) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        let request = OpenAIRequest {
            model: &self.config.model,
            messages: Self::messages(system, user),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: OpenAIResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    /// Call the Ollama chat API (non-streaming).
    async fn call_ollama(&self, system: Option<&str>, user: &str) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: &self.config.model,
            messages: Self::messages(system, user),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionGateway for LlmClient {
    async fn complete(&self, system: Option<&str>, user: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let started = Instant::now();
        let raw = match self.config.provider {
            LlmProvider::OpenAI => self.call_openai(system, user).await?,
            LlmProvider::Ollama => self.call_ollama(system, user).await?,
        };
        debug!(
            model = %self.config.model,
            endpoint = %self.config.endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion received"
        );

        Ok(raw.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
