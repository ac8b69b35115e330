//! AI 后端模块：真实 HTTP 端点与确定性离线实现共用同一接口。
//!
//! # AI Backend Module
//!
//! The narrow outbound interface of the runtime: `generate(prompt) -> text`.
//! Two implementations satisfy it. [`HttpBackend`] talks to the real,
//! authenticated endpoint; [`MockBackend`] synthesizes deterministic
//! responses for offline and credential-less operation. The backend is
//! selected once at construction, so the rest of the pipeline never
//! branches on the mode.

mod http;
mod mock;

pub use http::{HttpBackend, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock::MockBackend;

use crate::Result;
use async_trait::async_trait;

/// A text-generation endpoint, treated as a black box.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Run one generation call. Implementations perform exactly one
    /// request; retries and pacing are layered above.
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Failures raised by backend implementations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("endpoint response carried no generated text")]
    MissingContent,
}
