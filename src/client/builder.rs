use super::core::AnalysisClient;
use crate::backend::{AiBackend, HttpBackend, MockBackend, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::config::AnalysisConfig;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Environment variable consulted when no explicit credential is supplied.
pub const API_KEY_ENV: &str = "CONTENT_IQ_API_KEY";

/// Builder for [`AnalysisClient`].
///
/// Backend selection happens here, once: an explicit backend wins, then
/// offline mode, then a configured credential (argument or environment).
/// A missing credential is not an error; it selects the deterministic
/// backend for the client's lifetime.
pub struct AnalysisClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    offline: bool,
    config: Option<AnalysisConfig>,
    backend: Option<Arc<dyn AiBackend>>,
}

impl AnalysisClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            offline: false,
            config: None,
            backend: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Force the deterministic backend regardless of credentials.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject a custom backend; tests use this to script responses.
    pub fn backend(mut self, backend: Arc<dyn AiBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Result<AnalysisClient> {
        let config = self.config.unwrap_or_else(AnalysisConfig::from_env);
        config.validate()?;

        let backend: Arc<dyn AiBackend> = if let Some(backend) = self.backend {
            backend
        } else if self.offline {
            info!("offline mode requested, using deterministic backend");
            Arc::new(MockBackend::new())
        } else {
            let key = self
                .api_key
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .filter(|k| !k.trim().is_empty());
            match key {
                Some(key) => Arc::new(HttpBackend::new(
                    key,
                    self.base_url
                        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                    self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    config.request_timeout,
                )?),
                None => {
                    info!("no API credential configured, using deterministic backend");
                    Arc::new(MockBackend::new())
                }
            }
        };

        Ok(AnalysisClient::from_parts(backend, config))
    }
}

impl Default for AnalysisClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_selects_mock_backend() {
        std::env::remove_var(API_KEY_ENV);
        let client = AnalysisClientBuilder::new().build().unwrap();
        assert_eq!(client.backend_name(), "mock");
    }

    #[test]
    fn test_blank_credential_selects_mock_backend() {
        let client = AnalysisClientBuilder::new().api_key("   ").build().unwrap();
        assert_eq!(client.backend_name(), "mock");
    }

    #[test]
    fn test_explicit_credential_selects_http_backend() {
        let client = AnalysisClientBuilder::new()
            .api_key("sk-test")
            .build()
            .unwrap();
        assert_eq!(client.backend_name(), "http");
    }

    #[test]
    fn test_offline_overrides_credential() {
        let client = AnalysisClientBuilder::new()
            .api_key("sk-test")
            .offline(true)
            .build()
            .unwrap();
        assert_eq!(client.backend_name(), "mock");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalysisConfig::new().with_retry_attempts(0);
        assert!(AnalysisClientBuilder::new().config(config).build().is_err());
    }
}
