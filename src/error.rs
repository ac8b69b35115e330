use crate::backend::BackendError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or field that caused the error (e.g., "config.retry_attempts")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "concurrency_gate", "config_validator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the analysis runtime.
///
/// Only exhausted-retry call failures reach callers as hard errors; response
/// shape problems are recovered locally with defaulted results, and a missing
/// credential selects the deterministic backend instead of failing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },

    #[error("Attempt timed out after {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new runtime error without structured context
    pub fn runtime(msg: impl Into<String>) -> Self {
        Error::Runtime {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_builders() {
        let ctx = ErrorContext::new()
            .with_field_path("config.batch_size")
            .with_details("must be at least 1")
            .with_source("config_validator");
        assert_eq!(ctx.field_path.as_deref(), Some("config.batch_size"));
        assert_eq!(ctx.details.as_deref(), Some("must be at least 1"));
        assert_eq!(ctx.source.as_deref(), Some("config_validator"));
    }

    #[test]
    fn test_error_display_includes_context() {
        let err = Error::configuration_with_context(
            "invalid value",
            ErrorContext::new().with_field_path("config.retry_attempts"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("invalid value"));
        assert!(rendered.contains("config.retry_attempts"));
    }

    #[test]
    fn test_runtime_error_without_context() {
        let err = Error::runtime("something went sideways");
        assert_eq!(err.to_string(), "Runtime error: something went sideways");
        assert_eq!(err.context(), Some(&ErrorContext::new()));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout { waited_ms: 60_000 };
        assert_eq!(err.to_string(), "Attempt timed out after 60000 ms");
        assert!(err.context().is_none());
    }
}
