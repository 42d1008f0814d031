//! Public navigation façade.
//!
//! [`NavigationService`] translates product-level intents (home, profile, a
//! calculator tool, a help topic, back, a deep link) into
//! [`NavigationHandler`] calls. It holds no navigation state of its own: the
//! stack lives in the handler, concrete units come from the [`UnitFactory`].
//!
//! The service is cheap to clone; clones share the same handler.
//!
//! # Example
//!
//! ```no_run
//! use bikecalc_navigator::{factory_fn, NavigationError, NavigationIntent, NavigationService};
//! # use bikecalc_navigator::RoutableUnit;
//! # use std::sync::Arc;
//! # fn build_unit(_: &NavigationIntent) -> Arc<dyn RoutableUnit> { unimplemented!() }
//!
//! # async fn run() -> Result<(), NavigationError> {
//! let navigator = NavigationService::builder()
//!     .factory(factory_fn(|intent, _navigator| Ok(build_unit(intent))))
//!     .build()?;
//!
//! navigator.navigate_to_home().await?;
//! navigator.navigate_to_tool("gear-ratio").await?;
//! navigator.navigate_back().await;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, IntentCache};
use crate::cleanup::EvictionReport;
use crate::config::NavigatorConfig;
use crate::context::NavigationContext;
use crate::error::{NavigationError, NavigationResult};
use crate::guards::NavigationGuard;
use crate::handler::{BusyIndicator, NavigationHandler, NavigationHandlerBuilder};
use crate::intent::{IntentRouter, NavigationIntent, ResolvedPath};
use crate::lifecycle::RoutableUnit;
use crate::observer::NavigationObserver;
use crate::params::NavigationParams;
use crate::{debug_log, error_log, info_log};
use std::sync::{Arc, Weak};

// ============================================================================
// UnitFactory
// ============================================================================

/// Builds concrete units for navigation intents.
///
/// The factory receives the service so units that navigate further can keep
/// a handle to it. Prefer [`NavigationService::downgrade`] for that: a unit
/// holding a strong clone keeps the whole navigator alive while it is stacked.
pub trait UnitFactory: Send + Sync + 'static {
    /// Create a new unit for `intent`.
    fn create(
        &self,
        intent: &NavigationIntent,
        navigator: &NavigationService,
    ) -> Result<Arc<dyn RoutableUnit>, NavigationError>;
}

/// Create a factory from a function or closure.
pub const fn factory_fn<F>(f: F) -> FnFactory<F>
where
    F: Fn(&NavigationIntent, &NavigationService) -> Result<Arc<dyn RoutableUnit>, NavigationError>
        + Send
        + Sync
        + 'static,
{
    FnFactory { f }
}

/// Factory created from a function or closure via [`factory_fn`].
pub struct FnFactory<F> {
    f: F,
}

impl<F> UnitFactory for FnFactory<F>
where
    F: Fn(&NavigationIntent, &NavigationService) -> Result<Arc<dyn RoutableUnit>, NavigationError>
        + Send
        + Sync
        + 'static,
{
    fn create(
        &self,
        intent: &NavigationIntent,
        navigator: &NavigationService,
    ) -> Result<Arc<dyn RoutableUnit>, NavigationError> {
        (self.f)(intent, navigator)
    }
}

// ============================================================================
// NavigationService
// ============================================================================

struct ServiceInner {
    handler: NavigationHandler,
    factory: Arc<dyn UnitFactory>,
    intents: IntentRouter,
    #[cfg(feature = "cache")]
    cache: parking_lot::Mutex<IntentCache>,
}

/// Intent-level navigation API.
#[derive(Clone)]
pub struct NavigationService {
    inner: Arc<ServiceInner>,
}

/// Non-owning handle to a [`NavigationService`].
#[derive(Clone)]
pub struct WeakNavigationService {
    inner: Weak<ServiceInner>,
}

impl WeakNavigationService {
    /// Get the service back, if it is still alive.
    pub fn upgrade(&self) -> Option<NavigationService> {
        self.inner.upgrade().map(|inner| NavigationService { inner })
    }
}

impl NavigationService {
    /// Start building a service.
    pub fn builder() -> NavigationServiceBuilder {
        NavigationServiceBuilder::new()
    }

    /// Non-owning handle for units that navigate further.
    pub fn downgrade(&self) -> WeakNavigationService {
        WeakNavigationService {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn handler(&self) -> &NavigationHandler {
        &self.inner.handler
    }

    /// Fresh context for a call, sourced from the currently active unit.
    fn context(&self, params: NavigationParams) -> NavigationContext {
        let context = NavigationContext::new().with_params(params);
        match self.handler().active() {
            Some(active) => context.with_source(active.path_segment()),
            None => context,
        }
    }

    fn create(&self, intent: &NavigationIntent) -> Result<Arc<dyn RoutableUnit>, NavigationError> {
        self.inner.factory.create(intent, self).map_err(|err| {
            error_log!("Unit factory failed for {}: {}", intent, err);
            err
        })
    }

    fn validate(unit: &dyn RoutableUnit) -> Result<(), NavigationError> {
        if unit.path_segment().trim().is_empty() {
            return Err(NavigationError::InvalidUnit {
                name: unit.name().to_string(),
                message: "empty path segment".to_string(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Named intents
    // ========================================================================

    /// Clear the stack and show a fresh home unit.
    ///
    /// The home unit is created before the stack is cleared, so a factory
    /// failure leaves the current stack untouched.
    pub async fn navigate_to_home(&self) -> Result<NavigationResult, NavigationError> {
        self.navigate_home_with(NavigationParams::new()).await
    }

    async fn navigate_home_with(
        &self,
        params: NavigationParams,
    ) -> Result<NavigationResult, NavigationError> {
        let unit = self.create(&NavigationIntent::Home)?;
        Self::validate(unit.as_ref())?;
        let cleared = self.handler().clear_async().await;
        debug_log!("Home navigation cleared {} units", cleared);
        let context = NavigationContext::new().with_params(params);
        Ok(self.handler().push_async(unit, &context).await)
    }

    /// Push a fresh profile unit.
    pub async fn navigate_to_profile(&self) -> Result<NavigationResult, NavigationError> {
        self.navigate_to_intent(NavigationIntent::Profile, NavigationParams::new())
            .await
    }

    /// Push a fresh unit for the calculator tool `id`.
    pub async fn navigate_to_tool(
        &self,
        id: impl Into<String>,
    ) -> Result<NavigationResult, NavigationError> {
        self.navigate_to_intent(NavigationIntent::Tool(id.into()), NavigationParams::new())
            .await
    }

    /// Push a fresh unit for the help topic `id`.
    pub async fn navigate_to_help(
        &self,
        id: impl Into<String>,
    ) -> Result<NavigationResult, NavigationError> {
        self.navigate_to_intent(NavigationIntent::Help(id.into()), NavigationParams::new())
            .await
    }

    /// Dispatch any intent. [`NavigationIntent::Home`] clears the stack first.
    pub async fn navigate_to_intent(
        &self,
        intent: NavigationIntent,
        params: NavigationParams,
    ) -> Result<NavigationResult, NavigationError> {
        if intent == NavigationIntent::Home {
            return self.navigate_home_with(params).await;
        }
        let unit = self.create(&intent)?;
        let context = self.context(params);
        self.navigate_to_with(unit, &context).await
    }

    /// Resolve a deep link (e.g. `/tools/spoke-length?erd=601`) and navigate to it.
    ///
    /// This is also how a caller honors a guard redirect:
    ///
    /// ```no_run
    /// # use bikecalc_navigator::{NavigationError, NavigationService};
    /// # async fn run(navigator: NavigationService) -> Result<(), NavigationError> {
    /// let result = navigator.navigate_to_profile().await?;
    /// if let Some(target) = result.redirect_path() {
    ///     navigator.navigate_to_path(target).await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn navigate_to_path(&self, path: &str) -> Result<NavigationResult, NavigationError> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| NavigationError::UnknownPath(path.to_string()))?;
        info_log!("Deep link '{}' → {}", path, resolved.intent);
        self.navigate_to_intent(resolved.intent, resolved.params)
            .await
    }

    /// Resolve a deep link without navigating.
    pub fn resolve(&self, path: &str) -> Option<ResolvedPath> {
        #[cfg(feature = "cache")]
        if let Some(hit) = self.inner.cache.lock().get(path) {
            return Some(hit);
        }

        let resolved = self.inner.intents.resolve(path)?;
        #[cfg(feature = "cache")]
        self.inner
            .cache
            .lock()
            .insert(path.to_string(), resolved.clone());
        Some(resolved)
    }

    // ========================================================================
    // Generic navigation
    // ========================================================================

    /// Push `unit` with a fresh context.
    pub async fn navigate_to(
        &self,
        unit: Arc<dyn RoutableUnit>,
    ) -> Result<NavigationResult, NavigationError> {
        let context = self.context(NavigationParams::new());
        self.navigate_to_with(unit, &context).await
    }

    /// Push `unit` with the given context.
    ///
    /// Fails with [`NavigationError::InvalidUnit`] when the unit has an empty
    /// path segment; a blocked push is `Ok(NavigationResult::Blocked { .. })`.
    pub async fn navigate_to_with(
        &self,
        unit: Arc<dyn RoutableUnit>,
        context: &NavigationContext,
    ) -> Result<NavigationResult, NavigationError> {
        Self::validate(unit.as_ref())?;
        Ok(self.handler().push_async(unit, context).await)
    }

    /// Pop the active unit.
    ///
    /// Returns `None` without touching the handler when there is nothing to
    /// pop, otherwise the result of [`NavigationHandler::pop_async`].
    pub async fn navigate_back(&self) -> Option<bool> {
        if !self.can_navigate_back() {
            debug_log!("Back navigation ignored: nothing to pop");
            return None;
        }
        let context = self.context(NavigationParams::new());
        Some(self.handler().pop_async(&context).await)
    }

    // ========================================================================
    // State
    // ========================================================================

    /// The active unit.
    pub fn current_unit(&self) -> Option<Arc<dyn RoutableUnit>> {
        self.handler().active()
    }

    /// Return `true` if there is at least one unit to pop.
    pub fn can_navigate_back(&self) -> bool {
        self.handler().can_pop()
    }

    /// Snapshot of the stack, active first.
    pub fn items(&self) -> Vec<Arc<dyn RoutableUnit>> {
        self.handler().items()
    }

    /// Re-raise handler notifications to `observer`.
    pub fn subscribe<O: NavigationObserver>(&self, observer: O) {
        self.handler().subscribe(observer);
    }

    /// The underlying handler.
    pub fn navigation_handler(&self) -> &NavigationHandler {
        self.handler()
    }

    /// Deep-link cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.lock().stats().clone()
    }

    /// Stop background eviction and tear down every unit.
    pub async fn shutdown(&self) -> EvictionReport {
        self.handler().shutdown().await
    }
}

impl std::fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationService")
            .field("handler", &self.inner.handler)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`NavigationService`].
#[must_use]
#[derive(Default)]
pub struct NavigationServiceBuilder {
    handler: NavigationHandlerBuilder,
    factory: Option<Arc<dyn UnitFactory>>,
    config: NavigatorConfig,
}

impl NavigationServiceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unit factory (required).
    pub fn factory<F: UnitFactory>(mut self, factory: F) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Append a guard. Guards run in the order they are added.
    pub fn guard<G: NavigationGuard>(mut self, guard: G) -> Self {
        self.handler = self.handler.guard(guard);
        self
    }

    /// Register an observer.
    pub fn observer<O: NavigationObserver>(mut self, observer: O) -> Self {
        self.handler = self.handler.observer(observer);
        self
    }

    /// Attach the host busy indicator.
    pub fn busy_indicator(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.handler = self.handler.busy_indicator(busy);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the service.
    ///
    /// Fails with [`NavigationError::MissingDependency`] when no factory was set.
    pub fn build(self) -> Result<NavigationService, NavigationError> {
        let factory = self
            .factory
            .ok_or(NavigationError::MissingDependency("unit factory"))?;

        #[cfg(feature = "cache")]
        let cache = parking_lot::Mutex::new(IntentCache::with_capacity(
            self.config.intent_cache_capacity,
        ));
        let handler = self.handler.config(self.config).build();

        Ok(NavigationService {
            inner: Arc::new(ServiceInner {
                handler,
                factory,
                intents: IntentRouter::new(),
                #[cfg(feature = "cache")]
                cache,
            }),
        })
    }
}
