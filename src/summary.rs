//! Summary struct - the structured output contract for the summarizer.
//!
//! Also holds the pure parsing step that turns a raw model reply into a
//! validated [`Summary`], so it can be tested without a live model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJsonFound,
    #[error("model output does not match the summary schema: {0}")]
    SchemaValidation(#[from] serde_json::Error),
}

/// Structured summary returned by the model.
///
/// Only `tldr` is required; the list fields default to empty when the model
/// leaves them out. A `null` in any field is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// 1-2 sentence summary
    pub tldr: String,
    /// Main takeaways from the text
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Actionable items or next steps
    #[serde(default)]
    pub action_items: Vec<String>,
    /// Risks called out in the text
    #[serde(default)]
    pub risks: Vec<String>,
    /// Questions left unanswered
    #[serde(default)]
    pub open_questions: Vec<String>,
}

impl Summary {
    /// Create a summary with only a TL;DR
    pub fn new(tldr: impl Into<String>) -> Self {
        Self {
            tldr: tldr.into(),
            key_points: Vec::new(),
            action_items: Vec::new(),
            risks: Vec::new(),
            open_questions: Vec::new(),
        }
    }

    /// Shape of the expected reply, pretty-printed for the prompt
    pub fn schema_hint() -> String {
        let placeholder = || vec!["string".to_string()];
        let hint = Summary {
            tldr: "string".to_string(),
            key_points: placeholder(),
            action_items: placeholder(),
            risks: placeholder(),
            open_questions: placeholder(),
        };
        // Serialising a struct of strings cannot fail.
        serde_json::to_string_pretty(&hint).unwrap_or_default()
    }

    /// Full JSON Schema for the summary
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Summary)
    }
}

/// Parse a raw model reply into a [`Summary`].
///
/// The trimmed reply is parsed as-is first. If that fails, the span from the
/// first `{` to the last `}` is parsed instead, which recovers replies wrapped
/// in prose or code fences.
pub fn parse_summary(raw: &str) -> Result<Summary, ParseError> {
    let raw = raw.trim();

    match serde_json::from_str::<Summary>(raw) {
        Ok(summary) => Ok(summary),
        Err(err) => {
            tracing::debug!(error = %err, "direct parse failed, extracting JSON object");
            let candidate = extract_json_object(raw).ok_or(ParseError::NoJsonFound)?;
            Ok(serde_json::from_str(candidate)?)
        }
    }
}

/// Slice from the first `{` to the last `}`, inclusive.
///
/// Stray braces or several objects in the text are not treated specially.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
