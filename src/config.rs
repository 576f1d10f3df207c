//! Configuration management.
//!
//! Settings come from, lowest precedence first: built-in defaults, an optional
//! TOML file, environment variables, then CLI flags (applied by the caller).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;
use crate::rate_limit::RateLimitConfig;
use crate::repository::DbContext;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "advisor.db";

/// Environment variable naming a config file when `--config` isn't given.
pub const CONFIG_PATH_ENV: &str = "ADVISOR_CONFIG";

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base data directory (holds the SQLite database by default).
    pub data_dir: PathBuf,
    /// Database URL (overrides data_dir/advisor.db if set).
    pub database_url: Option<String>,
    /// Directory holding `index.html` and other frontend assets.
    pub static_dir: PathBuf,
    /// Directory holding the informational JSON documents.
    pub docs_dir: PathBuf,
    /// Take the client address from `X-Forwarded-For` (only behind a trusted proxy).
    pub trust_forwarded_for: bool,
    pub rate_limit: RateLimitConfig,
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database_url: None,
            static_dir: PathBuf::from("static"),
            docs_dir: PathBuf::from("."),
            trust_forwarded_for: false,
            rate_limit: RateLimitConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Load settings from an optional TOML file, then apply env overrides.
    ///
    /// With no explicit path, `ADVISOR_CONFIG` is consulted; with neither,
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let settings = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_env_overrides())
    }

    /// Parse a TOML file. Relative paths inside it stay relative to the
    /// working directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `ADVISOR_DATA_DIR`, `ADVISOR_STATIC_DIR`, `ADVISOR_DOCS_DIR`
    /// - `DATABASE_URL`
    /// - `TRUST_FORWARDED_FOR`: "true" or "1"
    /// - `RATE_LIMIT_*` and `LLM_*` (see the respective configs)
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env_nonempty("ADVISOR_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_nonempty("ADVISOR_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_nonempty("ADVISOR_DOCS_DIR") {
            self.docs_dir = PathBuf::from(dir);
        }
        if let Some(url) = env_nonempty("DATABASE_URL") {
            tracing::debug!("Using DATABASE_URL from environment: {}", url);
            self.database_url = Some(url);
        }
        if let Some(val) = env_nonempty("TRUST_FORWARDED_FOR") {
            self.trust_forwarded_for = val.eq_ignore_ascii_case("true") || val == "1";
        }
        self.rate_limit = self.rate_limit.with_env_overrides();
        self.llm = self.llm.with_env_overrides();
        self
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        match self.database_url {
            Some(ref url) => url.clone(),
            None => format!("sqlite:{}", self.database_path().display()),
        }
    }

    /// Get the full path to the default SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_DATABASE_FILENAME)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }

    /// Create a database context using the configured database URL or path.
    pub fn create_db_context(&self) -> DbContext {
        DbContext::from_url(&self.database_url())
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
