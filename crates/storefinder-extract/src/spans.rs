//! Locating candidate JSON payloads inside free text.

use std::sync::LazyLock;

use regex::Regex;

/// First fenced block labelled `json`. An unterminated block runs to the end
/// of the text.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```[ \t]*json\b\s*(.*?)(?:```|\z)").expect("valid regex"));

/// Body of the first ```` ```json ```` block, trimmed. `None` when there is no
/// such block or it is empty.
pub(crate) fn fenced_json_block(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
}

/// Slice from the first `open` to the last `close`, inclusive. `None` unless
/// both exist and the opener comes first.
pub(crate) fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..end + close.len_utf8()])
}
