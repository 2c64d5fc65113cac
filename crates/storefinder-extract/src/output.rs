use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an external agent handed back for one task.
///
/// Agents answer either with free text (usually prose wrapped around some
/// JSON) or with an already-structured value. No schema is implied by either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentOutput {
    Text(String),
    Structured(Value),
}

impl AgentOutput {
    /// Wraps a JSON value, unwrapping JSON strings into [`AgentOutput::Text`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }

    /// The raw answer as text, for logging and diagnostic records.
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AgentOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
