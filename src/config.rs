//! Configuration loading and management for precis.
//!
//! Loads settings from `precis.toml` (optional) with `.env` and environment
//! variable overrides for the API key and endpoint.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "precis.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("OPENAI_API_KEY not found; set it in the environment or a .env file")]
    MissingApiKey,
}

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier (e.g., "gpt-4.1-mini")
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
}

/// Settings for free-text questions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    /// System persona for the tutor
    pub persona: String,
    pub temperature: f64,
}

/// Settings for structured summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummariseConfig {
    pub temperature: f64,
}

/// API keys (loaded from environment only)
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub openai_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub ask: AskConfig,
    #[serde(default)]
    pub summarise: SummariseConfig,
    #[serde(skip)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the default location (precis.toml in cwd or home).
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        let mut config = Self::read_optional(Self::find_config_file().as_deref())?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_dotenv();
        let mut config = Self::read_file(path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn read_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read_file(path),
            None => {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "reading config");
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override settings from environment variables, looked up through `var`
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.api.openai_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.agent.base_url = url;
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.agent.model = model;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("precis")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Get the OpenAI API key
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .openai_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Set the API key directly, bypassing the environment
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api.openai_key = Some(key.into());
        self
    }
}

/// Load `.env` from the working directory if present
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "failed to load .env"),
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            persona: "You are a helpful AI tutor. \
                      Explain things clearly and concisely for a software engineer transitioning into AI."
                .to_string(),
            temperature: 0.4,
        }
    }
}

impl Default for SummariseConfig {
    fn default() -> Self {
        Self { temperature: 0.2 }
    }
}
