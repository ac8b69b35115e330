//! Operation-specific prompt construction.

use crate::types::{Operation, OperationRequest};

/// Inputs longer than this are cut before prompting so a single oversized
/// article cannot blow the endpoint's context window.
pub(crate) const MAX_CONTENT_CHARS: usize = 6000;

/// Build the prompt text for a request.
pub fn build_prompt(request: &OperationRequest) -> String {
    let content = truncate_chars(&request.content, MAX_CONTENT_CHARS);
    match request.operation {
        Operation::Analyze => {
            let source = request.source_type.as_deref().unwrap_or("content");
            format!(
                "You are a nutrition content analyst. Analyze the following {source} and \
                 respond with a single JSON object using exactly these fields: \
                 \"title\", \"summary\", \"keyPoints\" (array of strings), \
                 \"nutritionFacts\" (object with \"nutrients\", \"benefits\", \
                 \"recommendations\" arrays), \"tags\" (array of strings), \"category\", \
                 \"targetAudience\" (array of strings), \"credibilityIndicators\" \
                 (array of strings). Respond with the JSON object only.\n\n{content}"
            )
        }
        Operation::ExtractFacts => format!(
            "Extract the nutrition facts from the following content and respond with a \
             single JSON object using exactly these fields: \"nutrients\", \"benefits\", \
             \"recommendations\", \"warnings\", \"targetGroup\" (all arrays of short \
             strings). Respond with the JSON object only.\n\n{content}"
        ),
        Operation::GenerateTags => format!(
            "Suggest short topical tags for the following content. Reply with a \
             comma-separated list of at most 8 lowercase tags and nothing else.\n\n{content}"
        ),
    }
}

/// Prefix of `s` at most `max` characters long, cut on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_prompt_names_fields_and_source() {
        let req = OperationRequest::new(Operation::Analyze, "Garlic is great.")
            .with_source_type("article");
        let prompt = build_prompt(&req);
        assert!(prompt.contains("article"));
        assert!(prompt.contains("\"nutritionFacts\""));
        assert!(prompt.contains("Garlic is great."));
    }

    #[test]
    fn test_facts_prompt_mentions_warnings() {
        let req = OperationRequest::new(Operation::ExtractFacts, "x");
        assert!(build_prompt(&req).contains("\"warnings\""));
    }

    #[test]
    fn test_tags_prompt_asks_for_comma_separated_list() {
        let req = OperationRequest::new(Operation::GenerateTags, "x");
        assert!(build_prompt(&req).contains("comma-separated"));
    }

    #[test]
    fn test_oversized_content_is_truncated() {
        let big = "x".repeat(MAX_CONTENT_CHARS + 500);
        let req = OperationRequest::new(Operation::GenerateTags, big);
        let prompt = build_prompt(&req);
        assert!(prompt.len() < MAX_CONTENT_CHARS + 300);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = "héllo wörld";
        assert_eq!(truncate_chars(s, 4), "héll");
        assert_eq!(truncate_chars(s, 100), s);
    }
}
