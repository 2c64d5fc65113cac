//! Store record extraction from browser-agent answers.
//!
//! Structured answers are unwrapped directly. Text answers go through
//! [`TEXT_STRATEGIES`] in order (fenced JSON block, whole text, outer bracket
//! span, outer brace span) and the first strategy that yields usable records
//! wins. When none does, the result is a single diagnostic record holding the
//! raw answer. Extraction never fails.

mod output;
mod shape;
mod spans;
mod strategy;

pub use output::AgentOutput;
pub use strategy::{ExtractionMethod, TextStrategy, TEXT_STRATEGIES};

use serde_json::Value;
use storefinder_core::StoreRecord;

/// Result of running the extractor over one agent answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Stores {
        method: ExtractionMethod,
        stores: Vec<StoreRecord>,
    },
    /// Nothing structured was recoverable.
    Diagnostic(StoreRecord),
}

impl ExtractionOutcome {
    #[must_use]
    pub fn method(&self) -> Option<ExtractionMethod> {
        match self {
            Self::Stores { method, .. } => Some(*method),
            Self::Diagnostic(_) => None,
        }
    }

    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }

    #[must_use]
    pub fn into_stores(self) -> Vec<StoreRecord> {
        match self {
            Self::Stores { stores, .. } => stores,
            Self::Diagnostic(record) => vec![record],
        }
    }
}

/// Extracts store records from any agent answer.
#[must_use]
pub fn extract(output: &AgentOutput) -> ExtractionOutcome {
    match output {
        AgentOutput::Text(text) | AgentOutput::Structured(Value::String(text)) => {
            extract_from_text(text)
        }
        AgentOutput::Structured(value) => extract_from_value(value),
    }
}

/// Shorthand for `extract(output).into_stores()`.
#[must_use]
pub fn extract_stores(output: &AgentOutput) -> Vec<StoreRecord> {
    extract(output).into_stores()
}

/// Runs the text strategies in order over a free-form answer.
#[must_use]
pub fn extract_from_text(text: &str) -> ExtractionOutcome {
    for strategy in TEXT_STRATEGIES {
        if let Some(stores) = strategy.apply(text) {
            tracing::debug!(%strategy, count = stores.len(), "extracted stores from agent text");
            return ExtractionOutcome::Stores {
                method: ExtractionMethod::Text(strategy),
                stores,
            };
        }
    }

    tracing::warn!(
        chars = text.len(),
        "could not find JSON store data in agent answer; returning diagnostic record"
    );
    ExtractionOutcome::Diagnostic(StoreRecord::diagnostic(text))
}

/// Unwraps an already-structured answer: an array of store objects, or an
/// object nesting one under a known list key.
#[must_use]
pub fn extract_from_value(value: &Value) -> ExtractionOutcome {
    if let Value::String(text) = value {
        return extract_from_text(text);
    }

    match shape::records_from_container(value) {
        Some(stores) => {
            tracing::debug!(count = stores.len(), "agent returned structured stores");
            ExtractionOutcome::Stores {
                method: ExtractionMethod::Structured,
                stores,
            }
        }
        None => {
            tracing::warn!("structured agent answer has no store list; returning diagnostic record");
            ExtractionOutcome::Diagnostic(StoreRecord::diagnostic(value.to_string()))
        }
    }
}
