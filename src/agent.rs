//! LLM agents: free-text questions and structured summarization.

pub use crate::summary::Summary;

use crate::config::{Config, ConfigError};
use crate::llm::{ChatClient, ChatMessage, LlmError};
use crate::summary::{parse_summary, ParseError};
use thiserror::Error;

/// System instruction for the summarizer
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a precise AI assistant. \
    You MUST return ONLY valid JSON that matches the schema. \
    No markdown, no explanations, no extra text.";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Llm(LlmError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<LlmError> for AgentError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Config(err) => AgentError::Config(err),
            other => AgentError::Llm(other),
        }
    }
}

/// Answers free-text prompts under a fixed tutor persona
#[derive(Debug, Clone)]
pub struct Tutor {
    client: ChatClient,
    persona: String,
    temperature: f64,
}

impl Tutor {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        Ok(Self {
            client: ChatClient::new(config)?,
            persona: config.ask.persona.clone(),
            temperature: config.ask.temperature,
        })
    }

    /// Send a prompt and return the reply text
    pub async fn ask(&self, prompt: &str) -> Result<String, AgentError> {
        let messages = [
            ChatMessage::system(self.persona.as_str()),
            ChatMessage::user(prompt),
        ];
        Ok(self.client.complete(&messages, self.temperature).await?)
    }
}

/// Summarizes text into a schema-validated [`Summary`]
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: ChatClient,
    temperature: f64,
}

impl Summarizer {
    /// Build a summarizer from configuration.
    ///
    /// A missing API key fails here, before any request is made.
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        Ok(Self {
            client: ChatClient::new(config)?,
            temperature: config.summarise.temperature,
        })
    }

    /// Run one summarization request on the provided text
    pub async fn summarize(&self, text: &str) -> Result<Summary, AgentError> {
        let messages = [
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(build_summary_prompt(text)),
        ];

        let raw = self.client.complete(&messages, self.temperature).await?;
        tracing::debug!(chars = raw.len(), "received summary reply");

        Ok(parse_summary(&raw)?)
    }
}

/// Build the user prompt: schema hint, formatting rules, then the text
pub fn build_summary_prompt(text: &str) -> String {
    let schema = Summary::schema_hint();

    format!(
        r#"
Summarize the TEXT below using the JSON schema.

Schema:
{schema}

Rules:
- Return ONLY JSON
- TLDR max 2 sentences
- key_points: 3–6 bullets
- Use empty arrays [] if nothing applies

TEXT:
{text}
"#
    )
    .trim()
    .to_string()
}
