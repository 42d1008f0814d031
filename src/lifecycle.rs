//! Routable units and their lifecycle hooks.
//!
//! A *routable unit* is whatever the presentation layer shows as one screen:
//! the home page, the rider profile, a calculator tool, a help topic. The
//! navigation core consumes units only through the [`RoutableUnit`] trait and
//! never inspects their concrete type.
//!
//! # Lifecycle
//!
//! The core drives each unit through these steps:
//!
//! 1. **Construction** - by an external [`UnitFactory`](crate::UnitFactory),
//!    just before a push attempt.
//! 2. **`on_initialized`** - awaited once all guards allowed the push and the
//!    unit is on the stack.
//! 3. **`on_resume`** - awaited whenever the unit becomes active again because
//!    the unit above it was popped.
//! 4. **`on_destroy`** + **`dispose`** - graceful cleanup, right after the
//!    unit leaves the stack.
//! 5. **`on_force_destroy`** + **`dispose`** - forced cleanup by the eviction
//!    worker, for units whose graceful cleanup never ran.
//!
//! Exactly one of steps 4 and 5 runs per stack entry. Hook errors are logged
//! and swallowed; `dispose` runs regardless.

use crate::error::HookResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Identifies the toolbar the presentation layer shows alongside a unit.
pub type ToolbarKey = Arc<str>;

/// A screen-level unit managed by the navigation stack.
///
/// All hooks have no-op defaults so simple units only implement the
/// identity methods and [`dispose`](RoutableUnit::dispose).
///
/// # Example
///
/// ```no_run
/// use bikecalc_navigator::{HookResult, RoutableUnit};
///
/// struct GearRatioTool;
///
/// #[async_trait::async_trait]
/// impl RoutableUnit for GearRatioTool {
///     fn name(&self) -> &str {
///         "Gear ratio"
///     }
///
///     fn path_segment(&self) -> &str {
///         "gear-ratio"
///     }
///
///     async fn on_initialized(&self) -> HookResult {
///         // load last-used chainring/cog combination
///         Ok(())
///     }
///
///     fn dispose(&self) {}
/// }
/// ```
#[async_trait]
pub trait RoutableUnit: Send + Sync + 'static {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Unique path segment identifying this unit.
    fn path_segment(&self) -> &str;

    /// Toolbar shown with this unit, if any.
    fn toolbar(&self) -> Option<ToolbarKey> {
        None
    }

    /// Called once after the unit became the active unit.
    async fn on_initialized(&self) -> HookResult {
        Ok(())
    }

    /// Called when the unit becomes active again after a pop.
    async fn on_resume(&self) -> HookResult {
        Ok(())
    }

    /// Graceful teardown, right after the unit left the stack.
    async fn on_destroy(&self) -> HookResult {
        Ok(())
    }

    /// Forced teardown by the eviction worker.
    async fn on_force_destroy(&self) -> HookResult {
        Ok(())
    }

    /// Release resources. Must tolerate being called more than once.
    fn dispose(&self);
}

/// Return `true` if both references point at the same unit instance.
pub fn same_unit(a: &dyn RoutableUnit, b: &dyn RoutableUnit) -> bool {
    std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ())
}

impl std::fmt::Debug for dyn RoutableUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutableUnit")
            .field("name", &self.name())
            .field("path_segment", &self.path_segment())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
