//! # BikeCalc Navigator
//!
//! Stack-based view-model navigation core for the bicycle measurement
//! calculator:
//!
//! - **Navigation stack** - LIFO stack of routable units plus an untracked bag
//!   of units awaiting cleanup
//! - **Guards** - Async allow / deny / redirect pipeline evaluated before every push
//! - **Lifecycle hooks** - `on_initialized`, `on_resume`, `on_destroy`,
//!   `on_force_destroy` and `dispose`
//! - **Two-tier cleanup** - Graceful cleanup on pop, forced cleanup by a
//!   periodic eviction worker for anything left behind
//! - **Observers** - `changing` / `changed` notifications around every mutation
//! - **Intents and deep links** - Home, profile, tool and help intents,
//!   resolvable from paths such as `/tools/spoke-length?erd=601`
//!
//! # Quick Start
//!
//! ```no_run
//! use async_trait::async_trait;
//! use bikecalc_navigator::*;
//! use std::sync::Arc;
//!
//! struct Page(String);
//!
//! #[async_trait]
//! impl RoutableUnit for Page {
//!     fn name(&self) -> &str {
//!         &self.0
//!     }
//!
//!     fn path_segment(&self) -> &str {
//!         &self.0
//!     }
//!
//!     async fn on_initialized(&self) -> HookResult {
//!         // load data for the page
//!         Ok(())
//!     }
//!
//!     fn dispose(&self) {}
//! }
//!
//! # async fn run() -> Result<(), NavigationError> {
//! let navigator = NavigationService::builder()
//!     .factory(factory_fn(|intent, _| {
//!         Ok(Arc::new(Page(intent.to_string())) as Arc<dyn RoutableUnit>)
//!     }))
//!     .build()?;
//!
//! navigator.navigate_to_home().await?;
//! navigator.navigate_to_path("/tools/gear-ratio?chainring=50").await?;
//! assert!(navigator.can_navigate_back());
//! navigator.navigate_back().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Guards
//!
//! ```
//! use bikecalc_navigator::*;
//!
//! let guards = Guards::builder()
//!     .guard(AuthGuard::new(|| false, ["profile"], "/home"))
//!     .guard(UnitGuard::deny("admin", "not available in this build"))
//!     .build();
//! assert_eq!(guards.len(), 2);
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache for deep-link resolution

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core navigation modules
pub mod cleanup;
pub mod handler;
pub mod observer;
pub mod service;
pub mod stack;

// Error handling
pub mod error;

// Unit lifecycle
pub mod lifecycle;

// Guards
pub mod guards;

// Other modules
pub mod config;
pub mod context;
pub mod intent;
pub mod params;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, IntentCache};
pub use cleanup::{
    evict_pending, graceful_cleanup, run_cleanup, CleanupKind, CleanupOutcome, CleanupScope,
    EvictionReport, EvictionWorker,
};
pub use config::{NavigatorConfig, DEFAULT_EVICTION_INTERVAL, DEFAULT_INTENT_CACHE_CAPACITY};
pub use context::NavigationContext;
pub use error::{HookError, HookResult, NavigationError, NavigationResult};
pub use guards::{
    evaluate_guards, guard_fn, AuthCheckFn, AuthGuard, FnGuard, GuardBuilder, GuardResult, Guards,
    NavigationGuard, NotGuard, UnitGuard,
};
pub use handler::{
    BusyFlag, BusyIndicator, HandlerState, NavigationHandler, NavigationHandlerBuilder,
};
pub use intent::{IntentRouter, NavigationIntent, ResolvedPath};
pub use lifecycle::{same_unit, RoutableUnit, ToolbarKey};
pub use observer::{
    observer_fn, FnObserver, NavigationDirection, NavigationEvent, NavigationObserver,
};
pub use params::NavigationParams;
pub use service::{
    factory_fn, FnFactory, NavigationService, NavigationServiceBuilder, UnitFactory,
    WeakNavigationService,
};
pub use stack::{NavigationStack, TrackedUnit, UnitId};
