//! Chat-completion client for OpenAI-compatible APIs.
//!
//! Uses reqwest for the HTTP call. One request per call, no retries.

use crate::config::{Config, ConfigError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("precis/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("LLM response contained no message content")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    /// Build a client from configuration.
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let api_key = config.api_key()?.to_string();
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.agent.base_url.trim_end_matches('/').to_string(),
            model: config.agent.model.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send the messages and return the trimmed text of the first choice
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
        };

        tracing::info!(
            model = %self.model,
            messages = messages.len(),
            temperature,
            "sending chat completion"
        );

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, "chat completion responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}
