//! The navigation handler.
//!
//! [`NavigationHandler`] is the single place where the navigation stack is
//! mutated. It runs the guard pipeline, notifies observers, drives unit
//! lifecycle hooks and owns the background [`EvictionWorker`].
//!
//! # Push pipeline
//!
//! 1. State `Idle → Navigating`, host busy indicator on
//! 2. Guards, in registration order (see [`evaluate_guards`])
//! 3. On deny / redirect: state back to `Idle`, busy off, return
//!    [`NavigationResult::Blocked`]; nothing else happens
//! 4. Observers: `on_changing`
//! 5. Push onto the stack
//! 6. `on_initialized` on the new unit
//! 7. State `Idle`, busy off, observers: `on_changed`
//!
//! # Pop pipeline
//!
//! 1. Empty stack: return `false`, no notification
//! 2. Observers: `on_changing`
//! 3. Pop; the unit moves to the untracked bag
//! 4. Graceful cleanup of the popped unit
//! 5. `on_resume` on the new active unit, if any
//! 6. Observers: `on_changed`
//!
//! Navigation calls on the same handler are not serialised against each
//! other. Callers are expected to await one navigation before starting the
//! next. When pushes do overlap, the handler counts them: the state stays
//! `Navigating` and the busy indicator stays on until the last one finishes.
//! Each push reads the active unit once, before its guards run, so a guard of
//! an overlapping push may see a `from` that another push has already covered.

use crate::cleanup::{evict_pending, graceful_cleanup, EvictionReport, EvictionWorker};
use crate::config::NavigatorConfig;
use crate::context::NavigationContext;
use crate::error::NavigationResult;
use crate::guards::{evaluate_guards, GuardResult, NavigationGuard};
use crate::lifecycle::RoutableUnit;
use crate::observer::{NavigationDirection, NavigationEvent, NavigationObserver, ObserverList};
use crate::stack::NavigationStack;
use crate::{debug_log, info_log, trace_log, warn_log};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Busy indicator
// ============================================================================

/// Host-side busy flag, shown by the presentation layer as a spinner.
pub trait BusyIndicator: Send + Sync + 'static {
    /// Set or clear the flag.
    fn set_busy(&self, busy: bool);
}

/// Plain atomic [`BusyIndicator`].
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Create a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl BusyIndicator for BusyFlag {
    fn set_busy(&self, busy: bool) {
        self.0.store(busy, Ordering::SeqCst);
    }
}

/// Handler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerState {
    /// No push in progress
    #[default]
    Idle,
    /// At least one push is between guard evaluation and `on_initialized`
    Navigating,
}

// ============================================================================
// NavigationHandler
// ============================================================================

/// Orchestrates push / pop / clear and unit lifecycle.
pub struct NavigationHandler {
    stack: Arc<NavigationStack>,
    guards: Vec<Arc<dyn NavigationGuard>>,
    observers: ObserverList,
    busy: Option<Arc<dyn BusyIndicator>>,
    /// Pushes in progress; `Navigating` while non-zero
    in_flight: Mutex<usize>,
    config: NavigatorConfig,
    worker: Option<EvictionWorker>,
}

impl NavigationHandler {
    /// Start building a handler.
    pub fn builder() -> NavigationHandlerBuilder {
        NavigationHandlerBuilder::new()
    }

    /// Handler with no guards and default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    // ========================================================================
    // State machine
    // ========================================================================

    fn begin_push(&self) {
        let mut in_flight = self.in_flight.lock();
        *in_flight += 1;
        if *in_flight == 1 {
            trace_log!("Handler state Idle → Navigating");
            if let Some(busy) = &self.busy {
                busy.set_busy(true);
            }
        }
    }

    fn end_push(&self) {
        let mut in_flight = self.in_flight.lock();
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            trace_log!("Handler state Navigating → Idle");
            if let Some(busy) = &self.busy {
                busy.set_busy(false);
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> HandlerState {
        if *self.in_flight.lock() == 0 {
            HandlerState::Idle
        } else {
            HandlerState::Navigating
        }
    }

    /// Return `true` while a push is in progress.
    pub fn is_busy(&self) -> bool {
        self.state() == HandlerState::Navigating
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Run the guards and, if they all allow, push and initialize `unit`.
    pub async fn push_async(
        &self,
        unit: Arc<dyn RoutableUnit>,
        context: &NavigationContext,
    ) -> NavigationResult {
        self.begin_push();

        let active = self.stack.active();
        debug_log!(
            "Push '{}' requested (active: {:?}, source: {:?})",
            unit.path_segment(),
            active.as_ref().map(|u| u.path_segment().to_string()),
            context.source()
        );

        match evaluate_guards(&self.guards, active.as_deref(), unit.as_ref(), context).await {
            GuardResult::Allow => {}
            GuardResult::Deny { reason } => {
                warn_log!("Push of '{}' denied: {}", unit.path_segment(), reason);
                self.end_push();
                return NavigationResult::Blocked {
                    reason,
                    redirect: None,
                };
            }
            GuardResult::Redirect { to, reason } => {
                debug_log!(
                    "Push of '{}' redirected to '{}': {}",
                    unit.path_segment(),
                    to,
                    reason
                );
                self.end_push();
                return NavigationResult::Blocked {
                    reason,
                    redirect: Some(to),
                };
            }
        }

        let event = NavigationEvent::new(
            NavigationDirection::Forward,
            active.map(|u| u.name().to_string()),
            Some(unit.name().to_string()),
        );
        self.observers.changing(&event);

        let id = self.stack.push(Arc::clone(&unit));
        if let Err(err) = unit.on_initialized().await {
            warn_log!(
                "on_initialized failed for '{}' {}: {}",
                unit.name(),
                id,
                err
            );
        }

        self.end_push();
        self.observers.changed(&event);
        info_log!(
            "Navigated to '{}' (stack depth: {})",
            unit.path_segment(),
            self.stack.len()
        );
        NavigationResult::Success {
            path: unit.path_segment().to_string(),
        }
    }

    /// Pop the active unit, clean it up and resume the one below it.
    ///
    /// Returns `false` without notifying anyone when the stack is empty.
    pub async fn pop_async(&self, context: &NavigationContext) -> bool {
        let items = self.stack.items();
        let Some(leaving) = items.first() else {
            trace_log!("Pop on empty stack ignored");
            return false;
        };

        let event = NavigationEvent::new(
            NavigationDirection::Back,
            Some(leaving.name().to_string()),
            items.get(1).map(|u| u.name().to_string()),
        );
        self.observers.changing(&event);

        let Some(entry) = self.stack.pop() else {
            // another call emptied the stack after our snapshot
            self.observers.changed(&event);
            return false;
        };
        debug_log!(
            "Popped '{}' {} (source: {:?})",
            entry.unit().path_segment(),
            entry.id(),
            context.source()
        );

        graceful_cleanup(&self.stack, &entry, self.config.cleanup_scope).await;

        if let Some(next) = self.stack.active() {
            if let Err(err) = next.on_resume().await {
                warn_log!("on_resume failed for '{}': {}", next.name(), err);
            }
        }

        self.observers.changed(&event);
        true
    }

    /// Move every stacked unit to the untracked bag and clean each up.
    ///
    /// Returns how many units were removed. No observer is notified.
    pub async fn clear_async(&self) -> usize {
        let moved = self.stack.clear();
        debug_log!("Clearing {} units", moved.len());
        for entry in &moved {
            graceful_cleanup(&self.stack, entry, self.config.cleanup_scope).await;
        }
        moved.len()
    }

    /// Run one forced-cleanup pass over the untracked bag now.
    pub async fn evict_untracked(&self) -> EvictionReport {
        evict_pending(&self.stack).await
    }

    /// Stop the eviction worker and release the stack.
    ///
    /// Stacked units move to the untracked bag without running any hook; they
    /// are reclaimed by the next [`evict_untracked`](Self::evict_untracked) or
    /// [`shutdown`](Self::shutdown). Returns how many units were released.
    pub fn dispose(&self) -> usize {
        if let Some(worker) = &self.worker {
            worker.stop();
        }
        let released = self.stack.clear();
        debug_log!(
            "Handler disposed: {} stacked units released for eviction",
            released.len()
        );
        released.len()
    }

    /// Stop the worker, clear the stack and force-clean everything pending.
    pub async fn shutdown(&self) -> EvictionReport {
        if let Some(worker) = &self.worker {
            worker.stop_and_wait().await;
        }
        let moved = self.stack.clear();
        let report = evict_pending(&self.stack).await;
        info_log!(
            "Handler shut down ({} stacked units released, {:?})",
            moved.len(),
            report
        );
        report
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register an observer.
    pub fn subscribe<O: NavigationObserver>(&self, observer: O) {
        self.subscribe_arc(Arc::new(observer));
    }

    /// Register a shared observer.
    pub fn subscribe_arc(&self, observer: Arc<dyn NavigationObserver>) {
        debug_log!("Observer '{}' subscribed", observer.name());
        self.observers.add(observer);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The active unit.
    pub fn active(&self) -> Option<Arc<dyn RoutableUnit>> {
        self.stack.active()
    }

    /// Snapshot of tracked units, active first.
    pub fn items(&self) -> Vec<Arc<dyn RoutableUnit>> {
        self.stack.items()
    }

    /// Snapshot of units awaiting cleanup.
    pub fn untracked(&self) -> Vec<Arc<dyn RoutableUnit>> {
        self.stack.untracked()
    }

    /// Return `true` if there is at least one unit to pop.
    pub fn can_pop(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The underlying stack.
    pub fn stack(&self) -> &Arc<NavigationStack> {
        &self.stack
    }

    /// Number of registered guards.
    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Active configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Return `true` while the background eviction worker is alive.
    pub fn is_eviction_running(&self) -> bool {
        self.worker.as_ref().is_some_and(EvictionWorker::is_running)
    }
}

impl Default for NavigationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NavigationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationHandler")
            .field("stack", &self.stack)
            .field("guards", &self.guards.len())
            .field("observers", &self.observers.len())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`NavigationHandler`].
#[must_use]
#[derive(Default)]
pub struct NavigationHandlerBuilder {
    guards: Vec<Arc<dyn NavigationGuard>>,
    observers: Vec<Arc<dyn NavigationObserver>>,
    busy: Option<Arc<dyn BusyIndicator>>,
    config: NavigatorConfig,
}

impl NavigationHandlerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard. Guards run in the order they are added.
    pub fn guard<G: NavigationGuard>(self, guard: G) -> Self {
        self.guard_arc(Arc::new(guard))
    }

    /// Append a shared guard.
    pub fn guard_arc(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Register an observer.
    pub fn observer<O: NavigationObserver>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Attach the host busy indicator.
    pub fn busy_indicator(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.busy = Some(busy);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the handler and, if configured, spawn the eviction worker.
    ///
    /// The worker needs a tokio runtime; outside one, eviction only runs
    /// through [`NavigationHandler::evict_untracked`].
    pub fn build(self) -> NavigationHandler {
        let stack = Arc::new(NavigationStack::new());

        let worker = if self.config.spawn_eviction_worker {
            let worker = EvictionWorker::spawn(Arc::clone(&stack), self.config.eviction_interval);
            if worker.is_none() {
                warn_log!("No tokio runtime: eviction worker not started");
            }
            worker
        } else {
            None
        };

        let observers = ObserverList::default();
        for observer in self.observers {
            observers.add(observer);
        }

        NavigationHandler {
            stack,
            guards: self.guards,
            observers,
            busy: self.busy,
            in_flight: Mutex::new(0),
            config: self.config,
            worker,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::{guard_fn, UnitGuard};

    struct Screen(&'static str);

    #[async_trait::async_trait]
    impl RoutableUnit for Screen {
        fn name(&self) -> &str {
            self.0
        }

        fn path_segment(&self) -> &str {
            self.0
        }

        fn dispose(&self) {}
    }

    fn screen(name: &'static str) -> Arc<dyn RoutableUnit> {
        Arc::new(Screen(name))
    }

    fn offline() -> NavigatorConfig {
        NavigatorConfig::new().without_eviction_worker()
    }

    #[test]
    fn test_new_handler_is_idle_and_empty() {
        let handler = NavigationHandler::builder().config(offline()).build();
        assert_eq!(handler.state(), HandlerState::Idle);
        assert!(!handler.is_busy());
        assert!(!handler.can_pop());
        assert!(handler.active().is_none());
        assert!(!handler.is_eviction_running());
    }

    #[test]
    fn test_build_outside_runtime_has_no_worker() {
        let handler = NavigationHandler::new();
        assert!(!handler.is_eviction_running());
    }

    #[test]
    fn test_busy_flag_round_trip() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());
        flag.set_busy(true);
        assert!(flag.is_busy());
    }

    #[test]
    fn test_push_allowed() {
        let handler = NavigationHandler::builder().config(offline()).build();
        let result = pollster::block_on(handler.push_async(screen("home"), &NavigationContext::new()));

        assert_eq!(
            result,
            NavigationResult::Success {
                path: "home".to_string()
            }
        );
        assert_eq!(handler.active().unwrap().path_segment(), "home");
    }

    #[test]
    fn test_denied_push_resets_busy_state() {
        let busy = Arc::new(BusyFlag::new());
        let handler = NavigationHandler::builder()
            .config(offline())
            .busy_indicator(busy.clone())
            .guard(UnitGuard::deny("profile", "signed out"))
            .build();

        let result =
            pollster::block_on(handler.push_async(screen("profile"), &NavigationContext::new()));

        assert!(result.is_blocked());
        assert_eq!(handler.state(), HandlerState::Idle);
        assert!(!busy.is_busy());
        assert!(handler.items().is_empty());
    }

    #[test]
    fn test_guard_sees_busy_state() {
        let busy = Arc::new(BusyFlag::new());
        let seen = busy.clone();
        let handler = NavigationHandler::builder()
            .config(offline())
            .busy_indicator(busy.clone())
            .guard(guard_fn(move |_, _, _| {
                assert!(seen.is_busy());
                GuardResult::Allow
            }))
            .build();

        pollster::block_on(handler.push_async(screen("home"), &NavigationContext::new()));
        assert!(!busy.is_busy());
    }

    #[test]
    fn test_pop_empty_is_noop() {
        let handler = NavigationHandler::builder().config(offline()).build();
        assert!(!pollster::block_on(handler.pop_async(&NavigationContext::new())));
    }

    #[test]
    fn test_clear_returns_count() {
        let handler = NavigationHandler::builder().config(offline()).build();
        let context = NavigationContext::new();
        pollster::block_on(async {
            handler.push_async(screen("home"), &context).await;
            handler.push_async(screen("help"), &context).await;
            assert_eq!(handler.clear_async().await, 2);
        });
        assert!(handler.items().is_empty());
        assert!(handler.untracked().is_empty());
    }

    #[tokio::test]
    async fn test_build_inside_runtime_spawns_worker() {
        let handler = NavigationHandler::new();
        assert!(handler.is_eviction_running());

        handler.shutdown().await;
        assert!(!handler.is_eviction_running());
    }
}
