//! # Precis
//!
//! Small client for hosted LLM chat-completion APIs.
//!
//! ## Features
//!
//! - **Structured Summaries**: Returns a typed `Summary` validated against a fixed JSON schema,
//!   recovering JSON the model wrapped in prose or code fences
//! - **Tutor Prompts**: Free-text questions answered under a fixed system persona
//! - **Explicit Configuration**: `Config` is loaded once and passed to each agent

pub mod agent;
pub mod config;
pub mod llm;
pub mod summary;

pub use agent::{AgentError, Summarizer, Tutor};
pub use config::Config;
pub use summary::{parse_summary, ParseError, Summary};
