//! Best-effort parsing of model output into structured results.
//!
//! Model responses are free text that usually, but not always, contains the
//! JSON we asked for. The policy is implemented once here: find the first
//! parseable JSON object (direct parse, fenced block, or balanced-brace
//! scan), and on any failure degrade to a structurally valid default instead
//! of surfacing a parse error.

use crate::types::{AnalysisReport, FactSheet, Operation, OperationResult};
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Hard cap on generated tag lists.
pub const MAX_TAGS: usize = 8;

const FALLBACK_SUMMARY_CHARS: usize = 280;

/// Parse raw model output according to the operation that produced it.
pub fn parse_response(operation: Operation, raw: &str) -> OperationResult {
    match operation {
        Operation::Analyze => OperationResult::Analysis(parse_analysis(raw)),
        Operation::ExtractFacts => OperationResult::Facts(parse_facts(raw)),
        Operation::GenerateTags => OperationResult::Tags(parse_tags(raw)),
    }
}

/// Parse an analysis report, falling back to an empty report whose summary
/// echoes a prefix of the raw text.
pub fn parse_analysis(raw: &str) -> AnalysisReport {
    match extract_struct::<AnalysisReport>(raw) {
        Some(report) => report,
        None => {
            warn!(chars = raw.len(), "analysis response was not parseable, using fallback");
            AnalysisReport {
                summary: fallback_summary(raw),
                ..Default::default()
            }
        }
    }
}

/// Parse a fact sheet, falling back to all-empty lists.
pub fn parse_facts(raw: &str) -> FactSheet {
    match extract_struct::<FactSheet>(raw) {
        Some(facts) => facts,
        None => {
            warn!(chars = raw.len(), "facts response was not parseable, using fallback");
            FactSheet::default()
        }
    }
}

/// Treat the raw text as a comma-separated tag list: trim, drop empties and
/// surrounding quotes, cap at [`MAX_TAGS`].
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().trim_matches(['"', '\'', '.']).trim())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(str::to_owned)
        .collect()
}

fn fallback_summary(raw: &str) -> String {
    let prefix = crate::prompt::truncate_chars(raw.trim(), FALLBACK_SUMMARY_CHARS).trim();
    if prefix.is_empty() {
        "(empty response)".to_string()
    } else {
        prefix.to_string()
    }
}

fn extract_struct<T: DeserializeOwned>(raw: &str) -> Option<T> {
    // Most responses are the bare object we asked for.
    if let Ok(value) = serde_json::from_str::<T>(raw.trim()) {
        return Some(value);
    }

    // Markdown code fences are the next most common wrapper.
    for pattern in [r"```json\s*([\s\S]*?)\s*```", r"```\s*([\s\S]*?)\s*```"] {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(captures) = re.captures(raw) {
                if let Some(inner) = captures.get(1) {
                    if let Ok(value) = serde_json::from_str::<T>(inner.as_str().trim()) {
                        return Some(value);
                    }
                }
            }
        }
    }

    // Last resort: the first balanced object embedded in surrounding prose.
    let span = first_json_object(raw)?;
    serde_json::from_str::<T>(span).ok()
}

/// Locate the first balanced `{...}` span in `text`, honoring string
/// literals so braces inside quoted values do not confuse the scan.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
