//! HTTP backend against an OpenAI-compatible completions endpoint.

use super::{AiBackend, BackendError};
use crate::Result;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Authenticated transport to the real AI endpoint.
///
/// The credential is held privately and redacted from the `Debug` output;
/// it must never reach logs or error messages.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(BackendError::Http)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            model: model.into(),
            api_key: api_key.into(),
        })
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AiBackend for HttpBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let payload: serde_json::Value = response.json().await.map_err(BackendError::Http)?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or(BackendError::MissingContent)?;

        debug!(model = %self.model, chars = content.len(), "generation completed");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
