//! Core type definitions: operations, requests and structured results.

use serde::{Deserialize, Serialize};

/// The analysis operations the runtime knows how to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Full content analysis: summary, key points, facts, tags, audience.
    Analyze,
    /// Structured nutrition-fact extraction.
    ExtractFacts,
    /// Short tag list generation.
    GenerateTags,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Analyze => "analyze",
            Operation::ExtractFacts => "extract_facts",
            Operation::GenerateTags => "generate_tags",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work handed to the runtime. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub content: String,
    /// Content origin hint (e.g. "article", "product"); folded into the
    /// cache key when present.
    pub source_type: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: Operation, content: impl Into<String>) -> Self {
        Self {
            operation,
            content: content.into(),
            source_type: None,
        }
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }
}

/// Nutrition-oriented sub-structure of a full analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionFacts {
    pub nutrients: Vec<String>,
    pub benefits: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Parsed result of the Analyze operation.
///
/// Every field deserializes with a default so partial model output still
/// yields a structurally complete report; callers never see null lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisReport {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub nutrition_facts: NutritionFacts,
    pub tags: Vec<String>,
    pub category: String,
    pub target_audience: Vec<String>,
    pub credibility_indicators: Vec<String>,
}

/// Parsed result of the ExtractFacts operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactSheet {
    pub nutrients: Vec<String>,
    pub benefits: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub target_group: Vec<String>,
}

/// Tagged union over the three operation result shapes; this is what the
/// cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum OperationResult {
    Analysis(AnalysisReport),
    Facts(FactSheet),
    Tags(Vec<String>),
}

impl OperationResult {
    pub fn kind(&self) -> &'static str {
        match self {
            OperationResult::Analysis(_) => "analysis",
            OperationResult::Facts(_) => "facts",
            OperationResult::Tags(_) => "tags",
        }
    }

    pub fn into_analysis(self) -> Option<AnalysisReport> {
        match self {
            OperationResult::Analysis(report) => Some(report),
            _ => None,
        }
    }

    pub fn into_facts(self) -> Option<FactSheet> {
        match self {
            OperationResult::Facts(facts) => Some(facts),
            _ => None,
        }
    }

    pub fn into_tags(self) -> Option<Vec<String>> {
        match self {
            OperationResult::Tags(tags) => Some(tags),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_report_fills_defaults() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"title":"Garlic","summary":"Good for you."}"#).unwrap();
        assert_eq!(report.title, "Garlic");
        assert_eq!(report.summary, "Good for you.");
        assert!(report.key_points.is_empty());
        assert!(report.nutrition_facts.nutrients.is_empty());
        assert!(report.target_audience.is_empty());
    }

    #[test]
    fn test_report_accepts_camel_case_fields() {
        let json = r#"{
            "title": "t",
            "keyPoints": ["a"],
            "nutritionFacts": {"nutrients": ["vitamin c"]},
            "targetAudience": ["adults"],
            "credibilityIndicators": ["cited sources"]
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.key_points, vec!["a"]);
        assert_eq!(report.nutrition_facts.nutrients, vec!["vitamin c"]);
        assert_eq!(report.target_audience, vec!["adults"]);
        assert_eq!(report.credibility_indicators, vec!["cited sources"]);
    }

    #[test]
    fn test_result_kind_accessors() {
        let tags = OperationResult::Tags(vec!["a".into()]);
        assert_eq!(tags.kind(), "tags");
        assert_eq!(tags.clone().into_tags(), Some(vec!["a".to_string()]));
        assert!(tags.into_analysis().is_none());
    }

    #[test]
    fn test_request_builder() {
        let req = OperationRequest::new(Operation::Analyze, "body").with_source_type("article");
        assert_eq!(req.operation, Operation::Analyze);
        assert_eq!(req.source_type.as_deref(), Some("article"));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::ExtractFacts.to_string(), "extract_facts");
    }
}
