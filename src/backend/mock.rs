//! Deterministic stand-in backend.

use super::AiBackend;
use crate::Result;
use async_trait::async_trait;
use serde_json::json;

/// Synthesizes fixed, well-formed responses without any network access.
///
/// Selected when no credential is configured or when offline mode is
/// requested. It matches the instruction wording produced by the prompt
/// builders to decide which response shape to return, so each operation
/// still parses on the normal path.
#[derive(Debug, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.contains("comma-separated") {
            return Ok("nutrition, wellness, healthy eating, evidence based".to_string());
        }
        if prompt.contains("\"warnings\"") {
            return Ok(json!({
                "nutrients": ["vitamin c", "fiber"],
                "benefits": ["supports immune function"],
                "recommendations": ["consume as part of a balanced diet"],
                "warnings": ["consult a clinician before supplementing"],
                "targetGroup": ["general adult population"],
            })
            .to_string());
        }
        Ok(json!({
            "title": "Sample analysis",
            "summary": "Deterministic offline analysis of the supplied content.",
            "keyPoints": ["generated without network access"],
            "nutritionFacts": {
                "nutrients": ["vitamin c"],
                "benefits": ["supports general wellness"],
                "recommendations": ["verify with a nutrition professional"],
            },
            "tags": ["nutrition", "wellness"],
            "category": "general",
            "targetAudience": ["general readers"],
            "credibilityIndicators": ["offline sample data"],
        })
        .to_string())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
