//! 性能计数模块：请求、缓存与延迟的进程级统计。
//!
//! # Metrics Module
//!
//! Monotone counters for requests, cache traffic and latency, owned by one
//! client instance (no process globals). Counters only grow until an
//! explicit [`MetricsRecorder::reset`]; derived rates are computed at
//! snapshot time with zero-safe division.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time metrics view with derived rates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Mean latency over successful requests only, in milliseconds.
    pub average_response_time_ms: f64,
    pub success_rate: f64,
    pub cache_hit_rate: f64,
}

/// Running counters, safe for concurrent updates.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    success_latency_total_ms: AtomicU64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one settled operation. Failed requests count toward totals but
    /// not toward the latency average.
    pub fn record_outcome(&self, latency: Duration, success: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
            self.success_latency_total_ms
                .fetch_add(latency.as_millis() as u64, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let successful = self.successful.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let latency_total = self.success_latency_total_ms.load(Ordering::Relaxed);

        let average_response_time_ms = if successful == 0 {
            0.0
        } else {
            latency_total as f64 / successful as f64
        };
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };
        let cache_lookups = cache_hits + cache_misses;
        let cache_hit_rate = if cache_lookups == 0 {
            0.0
        } else {
            cache_hits as f64 / cache_lookups as f64
        };

        MetricsSnapshot {
            total_requests: total,
            successful_requests: successful,
            failed_requests: failed,
            cache_hits,
            cache_misses,
            average_response_time_ms,
            success_rate,
            cache_hit_rate,
        }
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.successful.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.success_latency_total_ms.store(0, Ordering::Relaxed);
    }
}
