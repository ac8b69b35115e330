//! 批处理模块：分块并发执行，块间插入限速停顿，单项失败不影响整体。
//!
//! # Batch Processing Module
//!
//! Runs a list of analysis requests as consecutive chunks: items inside a
//! chunk execute concurrently (the concurrency gate remains the real
//! throttle), chunks run one after another with a pacing pause in between,
//! and a failing item becomes a failed outcome without aborting its
//! siblings. Output order and cardinality always match the input.

use crate::client::AnalysisClient;
use crate::types::{Operation, OperationRequest, OperationResult};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

/// One batch item: content plus the operation to run on it.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub content: String,
    pub operation: Operation,
    pub source_type: Option<String>,
}

impl BatchRequest {
    pub fn new(operation: Operation, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            operation,
            source_type: None,
        }
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }
}

/// Per-item batch outcome, positionally aligned with the input list.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// The original input content, echoed back for correlation.
    pub input: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn succeeded(input: String, result: OperationResult) -> Self {
        Self {
            input,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    fn failed(input: String, error: String) -> Self {
        Self {
            input,
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

impl AnalysisClient {
    /// Process a list of items in chunks of `batch_size`.
    ///
    /// Returns exactly one outcome per input item, in input order,
    /// regardless of how many items fail.
    pub async fn process_batch(&self, items: Vec<BatchRequest>) -> Vec<BatchOutcome> {
        if items.is_empty() {
            return Vec::new();
        }
        let cfg = self.config_snapshot();
        let chunk_size = cfg.batch_size.max(1);
        let total = items.len();
        let chunk_count = total.div_ceil(chunk_size);
        let mut outcomes = Vec::with_capacity(total);

        for (index, chunk) in items.chunks(chunk_size).enumerate() {
            debug!(
                chunk = index + 1,
                chunks = chunk_count,
                size = chunk.len(),
                "processing batch chunk"
            );

            let runs = chunk.iter().map(|item| {
                let mut request = OperationRequest::new(item.operation, item.content.clone());
                request.source_type = item.source_type.clone();
                self.run_operation(request)
            });
            let results = join_all(runs).await;

            for (item, result) in chunk.iter().zip(results) {
                outcomes.push(match result {
                    Ok(value) => BatchOutcome::succeeded(item.content.clone(), value),
                    Err(err) => BatchOutcome::failed(item.content.clone(), err.to_string()),
                });
            }

            if index + 1 < chunk_count && !cfg.rate_limit_delay.is_zero() {
                tokio::time::sleep(cfg.rate_limit_delay).await;
            }
        }

        let failed = outcomes.iter().filter(|o| !o.success).count();
        info!(total, failed, "batch completed");
        outcomes
    }
}
