//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_ADVICE_PROMPT;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Default API endpoint for the provider.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LlmConfigFile")]
pub struct LlmConfig {
    /// Whether upstream calls are enabled at all
    pub enabled: bool,
    /// LLM provider (openai or ollama)
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Maximum tokens in response
    pub max_tokens: u32,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom system prompt for structured advice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice_prompt: Option<String>,
}

/// `[llm]` table as written in a config file; an omitted endpoint follows the
/// provider.
#[derive(Deserialize)]
struct LlmConfigFile {
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    provider: LlmProvider,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    advice_prompt: Option<String>,
}

impl From<LlmConfigFile> for LlmConfig {
    fn from(file: LlmConfigFile) -> Self {
        let endpoint = file
            .endpoint
            .unwrap_or_else(|| file.provider.default_endpoint().to_string());
        Self {
            enabled: file.enabled,
            provider: file.provider,
            endpoint,
            api_key: file.api_key,
            model: file.model,
            max_tokens: file.max_tokens,
            temperature: file.temperature,
            timeout_secs: file.timeout_secs,
            advice_prompt: file.advice_prompt,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: LlmProvider::default().default_endpoint().to_string(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            advice_prompt: None,
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "openai" (default), "groq", "together", or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature
    /// - `LLM_TIMEOUT_SECS`: Upstream request timeout
    /// - `LLM_ADVICE_PROMPT`: Custom structured-advice system prompt
    ///
    /// Without `LLM_API_KEY`, the key is taken from `OPENAI_API_KEY`
    /// (or `GROQ_API_KEY` when the provider is groq).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = std::env::var("LLM_PROVIDER").ok();
        if let Some(ref val) = explicit_provider {
            if let Some(provider) = LlmProvider::parse(val) {
                self.provider = provider;
            }
        }

        // Explicit endpoint always wins
        let explicit_endpoint = std::env::var("LLM_ENDPOINT").ok();
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        } else if let Some(ref provider_str) = explicit_provider {
            match provider_str.to_lowercase().as_str() {
                "groq" => self.endpoint = "https://api.groq.com/openai".to_string(),
                "together" => self.endpoint = "https://api.together.xyz".to_string(),
                _ => self.endpoint = self.provider.default_endpoint().to_string(),
            }
        }

        if let Ok(val) = std::env::var("LLM_API_KEY") {
            self.api_key = Some(val);
        }
        if self.api_key.is_none() {
            let is_groq = explicit_provider
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case("groq"));
            self.api_key = if is_groq {
                std::env::var("GROQ_API_KEY").ok()
            } else {
                std::env::var("OPENAI_API_KEY").ok()
            };
        }

        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_ADVICE_PROMPT") {
            self.advice_prompt = Some(val);
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Get the structured-advice system prompt, using custom or default.
    pub fn get_advice_prompt(&self) -> &str {
        self.advice_prompt
            .as_deref()
            .unwrap_or(DEFAULT_ADVICE_PROMPT)
    }
}
