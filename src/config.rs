//! Navigator configuration.
//!
//! # Example
//!
//! ```
//! use bikecalc_navigator::{CleanupScope, NavigatorConfig};
//! use std::time::Duration;
//!
//! let config = NavigatorConfig::new()
//!     .eviction_interval(Duration::from_secs(30))
//!     .cleanup_scope(CleanupScope::Unit);
//!
//! assert_eq!(config.eviction_interval, Duration::from_secs(30));
//! ```

use crate::cleanup::CleanupScope;
use std::time::Duration;

/// Default period of the eviction worker.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(120);

/// Default capacity of the deep-link resolution cache.
pub const DEFAULT_INTENT_CACHE_CAPACITY: usize = 64;

/// Tunables for [`NavigationHandler`](crate::NavigationHandler) and
/// [`NavigationService`](crate::NavigationService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Period of the background eviction worker
    pub eviction_interval: Duration,
    /// What a graceful cleanup releases from the untracked bag
    pub cleanup_scope: CleanupScope,
    /// Entries kept by the deep-link resolution cache
    pub intent_cache_capacity: usize,
    /// Spawn the eviction worker when the handler is built
    pub spawn_eviction_worker: bool,
}

impl NavigatorConfig {
    /// Configuration with defaults.
    pub fn new() -> Self {
        Self {
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
            cleanup_scope: CleanupScope::Unit,
            intent_cache_capacity: DEFAULT_INTENT_CACHE_CAPACITY,
            spawn_eviction_worker: true,
        }
    }

    /// Set the eviction period.
    #[must_use]
    pub fn eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    /// Set the graceful cleanup scope.
    #[must_use]
    pub fn cleanup_scope(mut self, scope: CleanupScope) -> Self {
        self.cleanup_scope = scope;
        self
    }

    /// Set the deep-link cache capacity (at least 1).
    #[must_use]
    pub fn intent_cache_capacity(mut self, capacity: usize) -> Self {
        self.intent_cache_capacity = capacity.max(1);
        self
    }

    /// Disable the background worker; eviction then only runs on demand.
    #[must_use]
    pub fn without_eviction_worker(mut self) -> Self {
        self.spawn_eviction_worker = false;
        self
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.eviction_interval, Duration::from_secs(120));
        assert_eq!(config.cleanup_scope, CleanupScope::Unit);
        assert_eq!(config.intent_cache_capacity, 64);
        assert!(config.spawn_eviction_worker);
    }

    #[test]
    fn test_builder_setters() {
        let config = NavigatorConfig::new()
            .eviction_interval(Duration::from_millis(50))
            .cleanup_scope(CleanupScope::AllPending)
            .intent_cache_capacity(0)
            .without_eviction_worker();

        assert_eq!(config.eviction_interval, Duration::from_millis(50));
        assert_eq!(config.cleanup_scope, CleanupScope::AllPending);
        assert_eq!(config.intent_cache_capacity, 1);
        assert!(!config.spawn_eviction_worker);
    }
}
