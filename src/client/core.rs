use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::AiBackend;
use crate::cache::{request_key, CacheStats, ResponseCache};
use crate::config::{AnalysisConfig, ConfigUpdate};
use crate::metrics::{MetricsRecorder, MetricsSnapshot};
use crate::parse;
use crate::prompt;
use crate::resilience::{ConcurrencyGate, GateSnapshot, RetryExecutor, RetryPolicy};
use crate::types::{AnalysisReport, FactSheet, Operation, OperationRequest, OperationResult};
use crate::{Error, Result};

/// The analysis runtime: schedules every operation through the shared
/// pipeline (cache lookup, gate acquisition, retried call, parse) against
/// one backend.
///
/// Each instance owns its cache, gate and metrics; construct one per
/// configuration and share it by reference (it is `Send + Sync`).
pub struct AnalysisClient {
    backend: Arc<dyn AiBackend>,
    cache: ResponseCache,
    gate: ArcSwap<ConcurrencyGate>,
    config: ArcSwap<AnalysisConfig>,
    metrics: MetricsRecorder,
}

impl AnalysisClient {
    pub(crate) fn from_parts(backend: Arc<dyn AiBackend>, config: AnalysisConfig) -> Self {
        let gate = ConcurrencyGate::new(config.max_concurrent_requests, config.rate_limit_delay);
        Self {
            backend,
            cache: ResponseCache::new(),
            gate: ArcSwap::from_pointee(gate),
            config: ArcSwap::from_pointee(config),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn builder() -> super::builder::AnalysisClientBuilder {
        super::builder::AnalysisClientBuilder::new()
    }

    /// Full content analysis: summary, key points, nutrition facts, tags,
    /// category and audience.
    pub async fn analyze(
        &self,
        content: impl Into<String>,
        source_type: Option<String>,
    ) -> Result<AnalysisReport> {
        let mut request = OperationRequest::new(Operation::Analyze, content);
        request.source_type = source_type;
        self.run_operation(request)
            .await?
            .into_analysis()
            .ok_or_else(|| Error::runtime("analysis produced a mismatched result kind"))
    }

    /// Structured nutrition-fact extraction.
    pub async fn extract_facts(&self, content: impl Into<String>) -> Result<FactSheet> {
        let request = OperationRequest::new(Operation::ExtractFacts, content);
        self.run_operation(request)
            .await?
            .into_facts()
            .ok_or_else(|| Error::runtime("extraction produced a mismatched result kind"))
    }

    /// Short tag list, at most eight entries.
    pub async fn generate_tags(&self, content: impl Into<String>) -> Result<Vec<String>> {
        let request = OperationRequest::new(Operation::GenerateTags, content);
        self.run_operation(request)
            .await?
            .into_tags()
            .ok_or_else(|| Error::runtime("tagging produced a mismatched result kind"))
    }

    /// Generic entry point for a pre-built request.
    pub async fn execute(&self, request: OperationRequest) -> Result<OperationResult> {
        self.run_operation(request).await
    }

    pub(crate) async fn run_operation(&self, request: OperationRequest) -> Result<OperationResult> {
        let cfg = self.config.load_full();
        let key = request_key(&request);

        // Dominant fast path: an unexpired cached result skips the gate, the
        // retry machinery and the network entirely.
        if let Some(hit) = self.cache.get(&key, cfg.cache_ttl) {
            self.metrics.record_cache_hit();
            debug!(operation = %request.operation, key = %key, "serving cached result");
            return Ok(hit);
        }
        self.metrics.record_cache_miss();

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let prompt = prompt::build_prompt(&request);
        let gate = self.gate.load_full();
        let backend = Arc::clone(&self.backend);
        let timeout = cfg.request_timeout;
        let retry = RetryExecutor::new(RetryPolicy::new(cfg.retry_attempts, cfg.retry_delay));

        // Each attempt acquires its own slot and releases it when the
        // attempt settles, so a timed-out call frees capacity before the
        // backoff and the next acquisition, and pacing applies to every
        // call start.
        let outcome = retry
            .run(|| {
                let gate = Arc::clone(&gate);
                let backend = Arc::clone(&backend);
                let prompt = prompt.clone();
                async move {
                    let _slot = gate.acquire().await?;
                    match tokio::time::timeout(timeout, backend.generate(&prompt)).await {
                        Ok(result) => result,
                        Err(_) => Err(Error::Timeout {
                            waited_ms: timeout.as_millis() as u64,
                        }),
                    }
                }
            })
            .await;

        match outcome {
            Ok(raw) => {
                let result = parse::parse_response(request.operation, &raw);
                self.cache.put(key, result.clone());
                let elapsed = started.elapsed();
                self.metrics.record_outcome(elapsed, true);
                info!(
                    %request_id,
                    operation = %request.operation,
                    backend = self.backend.name(),
                    duration_ms = elapsed.as_millis() as u64,
                    "operation completed"
                );
                Ok(result)
            }
            Err(err) => {
                let elapsed = started.elapsed();
                self.metrics.record_outcome(elapsed, false);
                warn!(
                    %request_id,
                    operation = %request.operation,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "operation failed after exhausting attempts"
                );
                Err(err)
            }
        }
    }

    /// Apply a partial configuration update. The gate is rebuilt only when
    /// its inputs changed; in-flight acquisitions finish on the old gate.
    pub fn update_config(&self, update: ConfigUpdate) -> Result<()> {
        let current = self.config.load_full();
        let next = update.apply(&current);
        next.validate()?;
        if next.max_concurrent_requests != current.max_concurrent_requests
            || next.rate_limit_delay != current.rate_limit_delay
        {
            self.gate.store(Arc::new(ConcurrencyGate::new(
                next.max_concurrent_requests,
                next.rate_limit_delay,
            )));
        }
        info!(?next, "configuration updated");
        self.config.store(Arc::new(next));
        Ok(())
    }

    pub fn config(&self) -> AnalysisConfig {
        self.config.load_full().as_ref().clone()
    }

    pub(crate) fn config_snapshot(&self) -> Arc<AnalysisConfig> {
        self.config.load_full()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn gate_snapshot(&self) -> GateSnapshot {
        self.gate.load_full().snapshot().await
    }
}
