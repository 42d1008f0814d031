//! Navigation guards for admission control.
//!
//! Guards are consulted **before** a push mutates the stack. Each guard looks
//! at the currently active unit, the candidate unit and the navigation
//! context, and answers with a [`GuardResult`].
//!
//! Guard checks are **asynchronous** and always awaited: a guard may ask the
//! rider to confirm discarding unsaved measurements, or look up a stored
//! preference, before answering.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Redirects protected units to a sign-in target |
//! | [`UnitGuard`] | Denies navigation to one specific unit |
//!
//! # Composition
//!
//! | Combinator | Logic |
//! |------------|-------|
//! | [`Guards`] | AND - all guards must allow |
//! | [`NotGuard`] | Invert - allow becomes deny, deny becomes allow |
//!
//! # Execution order
//!
//! Guards run in **registration order**. The first non-[`Allow`](GuardResult::Allow)
//! result short-circuits evaluation (see [`evaluate_guards`]).
//!
//! # Redirects
//!
//! A [`Redirect`](GuardResult::Redirect) is **not** followed by the navigation
//! core. It blocks the push exactly like a deny; the target is handed back in
//! [`NavigationResult::Blocked`](crate::NavigationResult::Blocked) so the caller
//! can decide to navigate there.
//!
//! # Example
//!
//! ```no_run
//! use bikecalc_navigator::{guard_fn, AuthGuard, GuardResult, Guards};
//!
//! let guard = Guards::builder()
//!     .guard(AuthGuard::new(|| true, ["profile"], "/home"))
//!     .guard(guard_fn(|_from, to, _cx| {
//!         if to.path_segment() == "beta-tool" {
//!             GuardResult::deny("Not released yet")
//!         } else {
//!             GuardResult::Allow
//!         }
//!     }))
//!     .build();
//! ```

use crate::context::NavigationContext;
use crate::lifecycle::RoutableUnit;
use crate::trace_log;
use async_trait::async_trait;
use std::sync::Arc;

// ============================================================================
// GuardResult
// ============================================================================

/// Answer of a single guard for a single push attempt.
///
/// # Example
///
/// ```
/// use bikecalc_navigator::GuardResult;
///
/// let result = GuardResult::deny("Unsaved measurements");
/// assert!(result.is_deny());
///
/// let result = GuardResult::redirect("/home", "Sign in first");
/// assert_eq!(result.redirect_path(), Some("/home"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    /// Allow the push to proceed.
    Allow,

    /// Deny the push with a reason.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Deny the push and suggest a different target.
    Redirect {
        /// Target the caller may navigate to instead.
        to: String,
        /// Human-readable reason for redirecting.
        reason: String,
    },
}

impl GuardResult {
    /// Create a result that blocks navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Create a result that blocks navigation and names an alternative target.
    pub fn redirect(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Check if this result allows navigation.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Check if this result denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this result redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect target, if this is a redirect.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// NavigationGuard trait
// ============================================================================

/// Trait for guards that control admission to the navigation stack.
///
/// # Example
///
/// ```no_run
/// use bikecalc_navigator::{GuardResult, NavigationContext, NavigationGuard, RoutableUnit};
///
/// struct UnsavedChangesGuard;
///
/// #[async_trait::async_trait]
/// impl NavigationGuard for UnsavedChangesGuard {
///     async fn can_navigate(
///         &self,
///         from: Option<&dyn RoutableUnit>,
///         _to: &dyn RoutableUnit,
///         _context: &NavigationContext,
///     ) -> GuardResult {
///         match from {
///             Some(unit) if unit.path_segment() == "spoke-length" => {
///                 GuardResult::deny("Spoke measurements not saved")
///             }
///             _ => GuardResult::Allow,
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait NavigationGuard: Send + Sync + 'static {
    /// Decide whether `to` may be pushed on top of `from`.
    async fn can_navigate(
        &self,
        from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        context: &NavigationContext,
    ) -> GuardResult;

    /// Guard name for debugging and log messages.
    fn name(&self) -> &'static str {
        "NavigationGuard"
    }
}

/// Run `guards` in order and return the first non-`Allow` result.
///
/// Every guard is awaited before the next one starts.
pub async fn evaluate_guards(
    guards: &[Arc<dyn NavigationGuard>],
    from: Option<&dyn RoutableUnit>,
    to: &dyn RoutableUnit,
    context: &NavigationContext,
) -> GuardResult {
    for guard in guards {
        let result = guard.can_navigate(from, to, context).await;
        trace_log!(
            "Guard '{}' for '{}' → {:?}",
            guard.name(),
            to.path_segment(),
            result
        );
        if !result.is_allow() {
            return result;
        }
    }
    GuardResult::Allow
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a synchronous function or closure.
///
/// # Example
///
/// ```no_run
/// use bikecalc_navigator::{guard_fn, GuardResult};
///
/// let no_self_push = guard_fn(|from, to, _cx| match from {
///     Some(active) if active.path_segment() == to.path_segment() => {
///         GuardResult::deny("Already showing this unit")
///     }
///     _ => GuardResult::Allow,
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(Option<&dyn RoutableUnit>, &dyn RoutableUnit, &NavigationContext) -> GuardResult
        + Send
        + Sync
        + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

#[async_trait]
impl<F> NavigationGuard for FnGuard<F>
where
    F: Fn(Option<&dyn RoutableUnit>, &dyn RoutableUnit, &NavigationContext) -> GuardResult
        + Send
        + Sync
        + 'static,
{
    async fn can_navigate(
        &self,
        from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        context: &NavigationContext,
    ) -> GuardResult {
        (self.f)(from, to, context)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Function type for authentication checks.
pub type AuthCheckFn = Box<dyn Fn() -> bool + Send + Sync>;

/// Redirects protected units to a sign-in target while the rider is signed out.
///
/// Units whose path segment is not in the protected set are always allowed.
///
/// # Example
///
/// ```no_run
/// use bikecalc_navigator::AuthGuard;
///
/// let guard = AuthGuard::new(|| false, ["profile"], "/home");
/// ```
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    protected: Vec<String>,
    redirect_path: String,
}

impl AuthGuard {
    /// Create a new auth guard over the given path segments.
    pub fn new<F, I, S>(check_fn: F, protected: I, redirect_path: impl Into<String>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            check_fn: Box::new(check_fn),
            protected: protected.into_iter().map(Into::into).collect(),
            redirect_path: redirect_path.into(),
        }
    }

    fn protects(&self, segment: &str) -> bool {
        self.protected.iter().any(|p| p == segment)
    }
}

#[async_trait]
impl NavigationGuard for AuthGuard {
    async fn can_navigate(
        &self,
        _from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        _context: &NavigationContext,
    ) -> GuardResult {
        if !self.protects(to.path_segment()) || (self.check_fn)() {
            GuardResult::Allow
        } else {
            GuardResult::redirect(
                &self.redirect_path,
                format!("Sign in required for '{}'", to.name()),
            )
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }
}

// ============================================================================
// UnitGuard
// ============================================================================

/// Denies every push of the unit with the given path segment.
pub struct UnitGuard {
    path_segment: String,
    reason: String,
}

impl UnitGuard {
    /// Deny pushes of `path_segment` with `reason`.
    pub fn deny(path_segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path_segment: path_segment.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl NavigationGuard for UnitGuard {
    async fn can_navigate(
        &self,
        _from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        _context: &NavigationContext,
    ) -> GuardResult {
        if to.path_segment() == self.path_segment {
            GuardResult::deny(self.reason.clone())
        } else {
            GuardResult::Allow
        }
    }

    fn name(&self) -> &'static str {
        "UnitGuard"
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// All guards must return [`GuardResult::Allow`] for navigation to proceed.
/// Guards run in the order they were added; the first non-allow result is
/// returned immediately.
pub struct Guards {
    guards: Vec<Arc<dyn NavigationGuard>>,
}

impl Guards {
    /// Create a new AND composition.
    #[must_use]
    pub fn new(guards: Vec<Arc<dyn NavigationGuard>>) -> Self {
        Self { guards }
    }

    /// Start building a guard composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    /// Number of composed guards.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Return `true` if no guards are composed.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[async_trait]
impl NavigationGuard for Guards {
    async fn can_navigate(
        &self,
        from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        context: &NavigationContext,
    ) -> GuardResult {
        evaluate_guards(&self.guards, from, to, context).await
    }

    fn name(&self) -> &'static str {
        "Guards"
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
pub struct GuardBuilder {
    guards: Vec<Arc<dyn NavigationGuard>>,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard to the composition.
    pub fn guard<G: NavigationGuard>(mut self, guard: G) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NotGuard
// ============================================================================

/// Inverts a guard result.
///
/// - `Allow` becomes `Deny`
/// - `Deny` becomes `Allow`
/// - `Redirect` is preserved as-is
pub struct NotGuard {
    guard: Box<dyn NavigationGuard>,
}

impl NotGuard {
    /// Create a new NOT guard wrapping the given guard.
    pub fn new<G: NavigationGuard>(guard: G) -> Self {
        Self {
            guard: Box::new(guard),
        }
    }
}

#[async_trait]
impl NavigationGuard for NotGuard {
    async fn can_navigate(
        &self,
        from: Option<&dyn RoutableUnit>,
        to: &dyn RoutableUnit,
        context: &NavigationContext,
    ) -> GuardResult {
        match self.guard.can_navigate(from, to, context).await {
            GuardResult::Allow => GuardResult::deny("Inverted: guard allowed but NOT expected"),
            GuardResult::Deny { .. } => GuardResult::Allow,
            redirect @ GuardResult::Redirect { .. } => redirect,
        }
    }

    fn name(&self) -> &'static str {
        "NotGuard"
    }
}

// ============================================================================
// Tests
// ============================================================================
