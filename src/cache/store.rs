//! TTL-bound in-memory response store.

use super::key::CacheKey;
use crate::types::OperationResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry {
    value: OperationResult,
    stored_at: Instant,
}

/// Internal cache counters, separate from request-level metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

/// In-memory, last-write-wins result cache.
///
/// Expiry is lazy: an entry older than the TTL supplied at read time is
/// treated as absent and purged on that read. The TTL is a `get` parameter
/// rather than stored state so runtime config updates apply immediately.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: AtomicStats,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Option<OperationResult> {
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(key.as_str()) {
            if entry.stored_at.elapsed() > ttl {
                entries.remove(key.as_str());
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.value.clone());
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn put(&self, key: CacheKey, value: OperationResult) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.as_str().to_owned(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            inserts: self.stats.inserts.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::request_key;
    use crate::types::{Operation, OperationRequest, OperationResult};
    use std::thread;

    fn key(content: &str) -> CacheKey {
        request_key(&OperationRequest::new(Operation::GenerateTags, content))
    }

    fn tags(values: &[&str]) -> OperationResult {
        OperationResult::Tags(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_put_then_get() {
        let cache = ResponseCache::new();
        cache.put(key("a"), tags(&["x"]));
        let hit = cache.get(&key("a"), Duration::from_secs(60));
        assert_eq!(hit, Some(tags(&["x"])));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = ResponseCache::new();
        assert_eq!(cache.get(&key("nope"), Duration::from_secs(60)), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_absent_and_purged() {
        let cache = ResponseCache::new();
        cache.put(key("a"), tags(&["x"]));
        thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&key("a"), Duration::from_millis(10)), None);
        // the expired entry was physically removed on that read
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let cache = ResponseCache::new();
        cache.put(key("a"), tags(&["old"]));
        cache.put(key("a"), tags(&["new"]));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&key("a"), Duration::from_secs(60)),
            Some(tags(&["new"]))
        );
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new();
        cache.put(key("a"), tags(&["x"]));
        cache.put(key("b"), tags(&["y"]));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_hit_ratio() {
        let cache = ResponseCache::new();
        cache.put(key("a"), tags(&["x"]));
        cache.get(&key("a"), Duration::from_secs(60));
        cache.get(&key("b"), Duration::from_secs(60));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_ratio_zero_when_untouched() {
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
