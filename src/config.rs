//! Runtime configuration for the analysis client.

use crate::{Error, ErrorContext, Result};
use std::time::Duration;

/// Tunable knobs for scheduling, retries, batching and caching.
///
/// Every field can be overridden independently; [`AnalysisConfig::from_env`]
/// layers `CONTENT_IQ_*` environment variables on top of the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Upper bound on simultaneously in-flight backend calls.
    pub max_concurrent_requests: usize,
    /// Per-attempt deadline for a single backend call.
    pub request_timeout: Duration,
    /// Total attempts per operation, including the first.
    pub retry_attempts: u32,
    /// Base backoff delay; doubles after each failed attempt.
    pub retry_delay: Duration,
    /// Number of batch items processed concurrently per chunk.
    pub batch_size: usize,
    /// Minimum gap between consecutive call starts, and the pause between
    /// batch chunks.
    pub rate_limit_delay: Duration,
    /// How long a cached result stays servable.
    pub cache_ttl: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 2,
            request_timeout: Duration::from_secs(60),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            batch_size: 1,
            rate_limit_delay: Duration::from_millis(1000),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `CONTENT_IQ_*` environment overrides.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(n) = env_parse::<usize>("CONTENT_IQ_MAX_CONCURRENT") {
            cfg.max_concurrent_requests = n;
        }
        if let Some(ms) = env_parse::<u64>("CONTENT_IQ_TIMEOUT_MS") {
            cfg.request_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse::<u32>("CONTENT_IQ_RETRY_ATTEMPTS") {
            cfg.retry_attempts = n;
        }
        if let Some(ms) = env_parse::<u64>("CONTENT_IQ_RETRY_DELAY_MS") {
            cfg.retry_delay = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse::<usize>("CONTENT_IQ_BATCH_SIZE") {
            cfg.batch_size = n;
        }
        if let Some(ms) = env_parse::<u64>("CONTENT_IQ_RATE_LIMIT_MS") {
            cfg.rate_limit_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("CONTENT_IQ_CACHE_TTL_MS") {
            cfg.cache_ttl = Duration::from_millis(ms);
        }
        cfg
    }

    pub fn with_max_concurrent_requests(mut self, n: usize) -> Self {
        self.max_concurrent_requests = n;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Reject values that would wedge the scheduler.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 {
            return Err(Error::configuration_with_context(
                "must be at least 1",
                ErrorContext::new()
                    .with_field_path("config.max_concurrent_requests")
                    .with_source("config_validator"),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(Error::configuration_with_context(
                "must be at least 1",
                ErrorContext::new()
                    .with_field_path("config.retry_attempts")
                    .with_source("config_validator"),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::configuration_with_context(
                "must be at least 1",
                ErrorContext::new()
                    .with_field_path("config.batch_size")
                    .with_source("config_validator"),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Partial configuration update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub max_concurrent_requests: Option<usize>,
    pub request_timeout: Option<Duration>,
    pub retry_attempts: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub batch_size: Option<usize>,
    pub rate_limit_delay: Option<Duration>,
    pub cache_ttl: Option<Duration>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_concurrent_requests(mut self, n: usize) -> Self {
        self.max_concurrent_requests = Some(n);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = Some(attempts);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = Some(delay);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Merge this update over a base configuration.
    pub fn apply(&self, base: &AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            max_concurrent_requests: self
                .max_concurrent_requests
                .unwrap_or(base.max_concurrent_requests),
            request_timeout: self.request_timeout.unwrap_or(base.request_timeout),
            retry_attempts: self.retry_attempts.unwrap_or(base.retry_attempts),
            retry_delay: self.retry_delay.unwrap_or(base.retry_delay),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            rate_limit_delay: self.rate_limit_delay.unwrap_or(base.rate_limit_delay),
            cache_ttl: self.cache_ttl.unwrap_or(base.cache_ttl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.max_concurrent_requests, 2);
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert_eq!(cfg.retry_attempts, 3);
        assert_eq!(cfg.retry_delay, Duration::from_millis(2000));
        assert_eq!(cfg.batch_size, 1);
        assert_eq!(cfg.rate_limit_delay, Duration::from_millis(1000));
        assert_eq!(cfg.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_config_builder() {
        let cfg = AnalysisConfig::new()
            .with_max_concurrent_requests(4)
            .with_retry_attempts(2)
            .with_batch_size(5)
            .with_cache_ttl(Duration::from_millis(100));
        assert_eq!(cfg.max_concurrent_requests, 4);
        assert_eq!(cfg.retry_attempts, 2);
        assert_eq!(cfg.batch_size, 5);
        assert_eq!(cfg.cache_ttl, Duration::from_millis(100));
    }

    #[test]
    fn test_config_validate_rejects_zero_concurrency() {
        let cfg = AnalysisConfig::new().with_max_concurrent_requests(0);
        let err = cfg.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("config.max_concurrent_requests"));
    }

    #[test]
    fn test_config_validate_rejects_zero_attempts() {
        let cfg = AnalysisConfig::new().with_retry_attempts(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_config_validate_rejects_zero_batch_size() {
        let cfg = AnalysisConfig::new().with_batch_size(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_update_merges_over_base() {
        let base = AnalysisConfig::default();
        let update = ConfigUpdate::new()
            .retry_attempts(5)
            .rate_limit_delay(Duration::from_millis(250));
        let merged = update.apply(&base);
        assert_eq!(merged.retry_attempts, 5);
        assert_eq!(merged.rate_limit_delay, Duration::from_millis(250));
        // untouched fields keep defaults
        assert_eq!(merged.max_concurrent_requests, 2);
        assert_eq!(merged.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("CONTENT_IQ_RETRY_ATTEMPTS", "7");
        std::env::set_var("CONTENT_IQ_RATE_LIMIT_MS", "50");
        let cfg = AnalysisConfig::from_env();
        std::env::remove_var("CONTENT_IQ_RETRY_ATTEMPTS");
        std::env::remove_var("CONTENT_IQ_RATE_LIMIT_MS");
        assert_eq!(cfg.retry_attempts, 7);
        assert_eq!(cfg.rate_limit_delay, Duration::from_millis(50));
        assert_eq!(cfg.batch_size, 1);
    }
}
