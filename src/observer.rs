//! Navigation change notifications.
//!
//! Observers are told **before** and **after** the stack changes. Unlike
//! guards (which decide *if* a push happens), observers only react: they
//! refresh the toolbar, update the title, move the busy spinner.
//!
//! For each push or pop that goes ahead, `on_changing` is called strictly
//! before the stack mutation and `on_changed` strictly after the lifecycle
//! hook that follows it. A blocked push and a pop on an empty stack notify
//! nobody.
//!
//! Observers are called synchronously, in registration order.
//!
//! # Creating observers
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`NavigationObserver`] | Full control, named |
//! | [`observer_fn`] | Quick one-off from two closures |
//!
//! # Example
//!
//! ```no_run
//! use bikecalc_navigator::{NavigationEvent, NavigationObserver};
//!
//! struct TitleObserver;
//!
//! impl NavigationObserver for TitleObserver {
//!     fn on_changing(&self, _event: &NavigationEvent) {}
//!
//!     fn on_changed(&self, event: &NavigationEvent) {
//!         println!("Now showing: {:?}", event.to);
//!     }
//! }
//! ```

use std::sync::Arc;

/// Direction of a stack change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// A unit was pushed
    Forward,
    /// A unit was popped
    Back,
}

/// Payload passed to observers.
///
/// `from` and `to` carry unit names; `to` is `None` after the last unit was popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub direction: NavigationDirection,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl NavigationEvent {
    /// Create an event.
    pub fn new(direction: NavigationDirection, from: Option<String>, to: Option<String>) -> Self {
        Self {
            direction,
            from,
            to,
        }
    }
}

/// Receives "changing" / "changed" notifications from the handler.
pub trait NavigationObserver: Send + Sync + 'static {
    /// Called before the stack changes.
    fn on_changing(&self, event: &NavigationEvent);

    /// Called after the stack changed and the affected unit was initialized or resumed.
    fn on_changed(&self, event: &NavigationEvent);

    /// Observer name for debugging.
    fn name(&self) -> &'static str {
        "NavigationObserver"
    }
}

/// Create an observer from two closures.
///
/// # Example
///
/// ```no_run
/// use bikecalc_navigator::observer_fn;
///
/// let observer = observer_fn(
///     |event| println!("Changing: {:?}", event.direction),
///     |event| println!("Changed to: {:?}", event.to),
/// );
/// ```
pub const fn observer_fn<B, A>(changing: B, changed: A) -> FnObserver<B, A>
where
    B: Fn(&NavigationEvent) + Send + Sync + 'static,
    A: Fn(&NavigationEvent) + Send + Sync + 'static,
{
    FnObserver { changing, changed }
}

/// Observer created from two closures via [`observer_fn`].
pub struct FnObserver<B, A> {
    changing: B,
    changed: A,
}

impl<B, A> NavigationObserver for FnObserver<B, A>
where
    B: Fn(&NavigationEvent) + Send + Sync + 'static,
    A: Fn(&NavigationEvent) + Send + Sync + 'static,
{
    fn on_changing(&self, event: &NavigationEvent) {
        (self.changing)(event);
    }

    fn on_changed(&self, event: &NavigationEvent) {
        (self.changed)(event);
    }
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct ObserverList {
    observers: Arc<parking_lot::RwLock<Vec<Arc<dyn NavigationObserver>>>>,
}

impl ObserverList {
    pub(crate) fn add(&self, observer: Arc<dyn NavigationObserver>) {
        self.observers.write().push(observer);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn NavigationObserver>> {
        self.observers.read().clone()
    }

    pub(crate) fn changing(&self, event: &NavigationEvent) {
        for observer in self.snapshot() {
            observer.on_changing(event);
        }
    }

    pub(crate) fn changed(&self, event: &NavigationEvent) {
        for observer in self.snapshot() {
            observer.on_changed(event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
