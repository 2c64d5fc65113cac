//! The ordered extraction strategies.

use serde_json::Value;
use storefinder_core::StoreRecord;

use crate::shape::{records_from_array, records_from_document};
use crate::spans::{fenced_json_block, outer_span};

/// Strategies applied to text answers, in priority order.
pub const TEXT_STRATEGIES: [TextStrategy; 4] = [
    TextStrategy::FencedBlock,
    TextStrategy::WholeText,
    TextStrategy::BracketSpan,
    TextStrategy::BraceSpan,
];

/// One way of pulling records out of a text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStrategy {
    /// Body of the first ```` ```json ```` fenced block.
    FencedBlock,
    /// The entire text as a JSON document.
    WholeText,
    /// First `[` through last `]`, as an array of store objects.
    BracketSpan,
    /// First `{` through last `}`, as a single store object.
    BraceSpan,
}

/// How a set of records was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// The agent returned structured data rather than text.
    Structured,
    Text(TextStrategy),
}

impl TextStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FencedBlock => "fenced_block",
            Self::WholeText => "whole_text",
            Self::BracketSpan => "bracket_span",
            Self::BraceSpan => "brace_span",
        }
    }

    /// Runs this strategy alone. `None` means nothing usable was found:
    /// no candidate span, a parse error, or a value of the wrong shape.
    #[must_use]
    pub fn apply(self, text: &str) -> Option<Vec<StoreRecord>> {
        match self {
            Self::FencedBlock => fenced_json_block(text)
                .and_then(|body| parse_json(self, body))
                .and_then(|value| records_from_document(&value)),
            Self::WholeText => {
                parse_json(self, text).and_then(|value| records_from_document(&value))
            }
            Self::BracketSpan => outer_span(text, '[', ']')
                .and_then(|span| parse_json(self, span))
                .and_then(|value| records_from_array(&value)),
            Self::BraceSpan => outer_span(text, '{', '}')
                .and_then(|span| parse_json(self, span))
                .and_then(|value| {
                    value
                        .as_object()
                        .map(|obj| vec![StoreRecord::from_json(obj)])
                }),
        }
    }
}

impl ExtractionMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Text(strategy) => strategy.as_str(),
        }
    }
}

impl std::fmt::Display for TextStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_json(strategy: TextStrategy, candidate: &str) -> Option<Value> {
    match serde_json::from_str(candidate.trim()) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::trace!(%strategy, %error, "candidate is not valid JSON");
            None
        }
    }
}
