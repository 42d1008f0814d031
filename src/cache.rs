//! Deep-link resolution caching.
//!
//! [`IntentCache`] is an LRU cache mapping raw deep-link strings (path plus
//! query) to their [`ResolvedPath`], so repeated links from toolbar buttons
//! and help cross-references skip the router lookup. It is gated behind the
//! `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Only successful resolutions are cached; unknown paths are looked up every
//! time.
//!
//! # Examples
//!
//! ```
//! use bikecalc_navigator::cache::IntentCache;
//! use bikecalc_navigator::{IntentRouter, NavigationIntent};
//!
//! let router = IntentRouter::new();
//! let mut cache = IntentCache::new();
//! cache.insert("/profile".to_string(), router.resolve("/profile").unwrap());
//!
//! assert_eq!(cache.get("/profile").unwrap().intent, NavigationIntent::Profile);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::intent::ResolvedPath;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: usize,
    /// Number of cache misses.
    pub misses: usize,
    /// Number of full cache invalidations (via [`IntentCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for deep-link resolution results.
#[derive(Debug)]
pub struct IntentCache {
    entries: LruCache<String, ResolvedPath>,
    stats: CacheStats,
}

impl IntentCache {
    const DEFAULT_CAPACITY: usize = crate::config::DEFAULT_INTENT_CACHE_CAPACITY;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a resolved link. Updates hit/miss stats.
    pub fn get(&mut self, link: &str) -> Option<ResolvedPath> {
        if let Some(entry) = self.entries.get(link) {
            self.stats.hits += 1;
            trace_log!("Intent cache hit for '{}'", link);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Intent cache miss for '{}'", link);
            None
        }
    }

    /// Insert a resolved link, evicting the least recently used entry if full.
    pub fn insert(&mut self, link: String, resolved: ResolvedPath) {
        trace_log!("Caching '{}' → {}", link, resolved.intent);
        self.entries.push(link, resolved);
    }

    /// Clear the cache and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Intent cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached links.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached links.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for IntentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentRouter, NavigationIntent};

    fn resolved(link: &str) -> ResolvedPath {
        IntentRouter::new().resolve(link).unwrap()
    }

    #[test]
    fn test_cache_creation() {
        let cache = IntentCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 64);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(IntentCache::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = IntentCache::new();
        assert!(cache.get("/help/erd").is_none());
        assert_eq!(cache.stats().misses, 1);

        cache.insert("/help/erd".to_string(), resolved("/help/erd"));
        assert_eq!(
            cache.get("/help/erd").unwrap().intent,
            NavigationIntent::Help("erd".into())
        );
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = IntentCache::with_capacity(2);
        cache.insert("/home".to_string(), resolved("/home"));
        cache.insert("/profile".to_string(), resolved("/profile"));
        cache.get("/home");
        cache.insert("/tools/a".to_string(), resolved("/tools/a"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/profile").is_none());
        assert!(cache.get("/home").is_some());
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = IntentCache::new();
        cache.insert("/home".to_string(), resolved("/home"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = IntentCache::new();
        cache.get("/a");
        cache.get("/b");
        cache.get("/c");
        cache.insert("/home".to_string(), resolved("/home"));
        cache.get("/home");
        cache.get("/home");

        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 3);
        assert!((cache.stats().hit_rate() - 0.4).abs() < 0.001);
    }
}
