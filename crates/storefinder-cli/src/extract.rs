//! `extract` command: replay the extraction chain over a saved agent answer.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::json;
use storefinder_extract::{extract, AgentOutput, ExtractionMethod};

pub fn run_extract(file: Option<&Path>) -> anyhow::Result<()> {
    let raw = read_answer(file)?;
    println!("{}", serde_json::to_string_pretty(&render(&raw))?);
    Ok(())
}

fn read_answer(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read agent answer from stdin")?;
            Ok(buf)
        }
    }
}

/// Runs extraction over `raw` and reports which step succeeded alongside
/// the records.
pub(crate) fn render(raw: &str) -> serde_json::Value {
    let outcome = extract(&AgentOutput::from(raw));
    let method = outcome.method().map_or("diagnostic", ExtractionMethod::as_str);
    json!({
        "method": method,
        "stores": outcome.into_stores(),
    })
}
