//! # content-iq
//!
//! 内容分析运行时：将摘要、事实抽取、标签生成请求安全地调度到同一个受限流的 AI 端点。
//!
//! An in-process AI content-analysis runtime. It turns text-analysis
//! operations (content summarization, structured-fact extraction, tag
//! generation) into safely-scheduled calls against a single external,
//! rate-limited text-generation endpoint, with caching, retry, batching and
//! performance accounting layered on top.
//!
//! ## Overview
//!
//! Every operation flows through the same pipeline: cache lookup, gate
//! acquisition (bounded concurrency plus pacing between call starts), a
//! retried and timed backend call, best-effort structured parsing, cache
//! store, metrics update. Repeated requests for identical content are
//! served from memory; malformed model output degrades to defaulted
//! results instead of errors; a missing credential selects a deterministic
//! offline backend rather than failing construction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use content_iq::AnalysisClient;
//!
//! #[tokio::main]
//! async fn main() -> content_iq::Result<()> {
//!     let client = AnalysisClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let report = client
//!         .analyze("Garlic supports immune function.", Some("article".into()))
//!         .await?;
//!     println!("{}: {}", report.title, report.summary);
//!
//!     let tags = client.generate_tags("Garlic supports immune function.").await?;
//!     println!("tags: {}", tags.join(", "));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The analysis client, operation pipeline and builder |
//! | [`backend`] | Outbound endpoint interface: real HTTP and deterministic mock |
//! | [`cache`] | Content-addressed, TTL-bound response cache |
//! | [`resilience`] | Concurrency gate with pacing, retry with backoff |
//! | [`batch`] | Chunked batch execution with partial-failure isolation |
//! | [`metrics`] | Request, cache and latency accounting |
//! | [`parse`] | Best-effort structured parsing of model output |
//! | [`prompt`] | Operation-specific prompt construction |
//! | [`config`] | Runtime configuration and partial updates |
//! | [`types`] | Operations, requests and structured result shapes |

pub mod backend;
pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod metrics;
pub mod parse;
pub mod prompt;
pub mod resilience;
pub mod types;

// Re-export main types for convenience
pub use batch::{BatchOutcome, BatchRequest};
pub use client::{AnalysisClient, AnalysisClientBuilder};
pub use config::{AnalysisConfig, ConfigUpdate};
pub use metrics::MetricsSnapshot;
pub use types::{
    AnalysisReport, FactSheet, NutritionFacts, Operation, OperationRequest, OperationResult,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
