//! Error handling for the navigation core.
//!
//! This module defines the outcome and error types of a navigation attempt:
//!
//! - [`NavigationResult`] - the outcome of a push (`Success` or `Blocked`).
//!   A blocked push is not an error: guards denying or redirecting is a normal,
//!   silent outcome.
//! - [`NavigationError`] - misuse of the API (invalid unit, missing builder
//!   dependency, unknown deep-link path). This is the only error class that
//!   propagates to callers.
//! - [`HookError`] / [`HookResult`] - what a unit's lifecycle hooks return.
//!   Hook failures are logged and swallowed by the core.
//!
//! # Examples
//!
//! ```
//! use bikecalc_navigator::NavigationResult;
//!
//! let result = NavigationResult::Success { path: "gear-ratio".into() };
//! assert!(result.is_success());
//!
//! let blocked = NavigationResult::Blocked {
//!     reason: "Sign in to edit your profile".into(),
//!     redirect: Some("/profile/login".into()),
//! };
//! assert_eq!(blocked.redirect_path(), Some("/profile/login"));
//! ```

use thiserror::Error;

/// Error returned by a unit's lifecycle hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a unit's lifecycle hook.
pub type HookResult = Result<(), HookError>;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a push through the guard pipeline.
///
/// Returned by [`NavigationHandler::push_async`](crate::NavigationHandler::push_async)
/// and every forward navigation on [`NavigationService`](crate::NavigationService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The unit was pushed and initialized
    Success {
        /// Path segment of the pushed unit.
        path: String,
    },
    /// A guard denied or redirected; the stack is unchanged
    Blocked {
        /// Human-readable reason for blocking navigation.
        reason: String,
        /// Target suggested by a redirecting guard, if any.
        redirect: Option<String>,
    },
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Get redirect target if blocked with a redirect.
    ///
    /// The core never follows redirects on its own; callers that want to
    /// honor one pass this to
    /// [`NavigationService::navigate_to_path`](crate::NavigationService::navigate_to_path).
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked {
                redirect: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }

    /// Get the block reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked { reason, .. } => Some(reason),
            NavigationResult::Success { .. } => None,
        }
    }
}

// ============================================================================
// NavigationError
// ============================================================================

/// Misuse of the navigation API.
///
/// Raised immediately and synchronously; never produced by guards or
/// lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The unit handed to a push cannot be routed
    #[error("Invalid unit '{name}': {message}")]
    InvalidUnit { name: String, message: String },

    /// A builder was finished without a required collaborator
    #[error("Missing required dependency: {0}")]
    MissingDependency(&'static str),

    /// No intent is registered for the deep-link path
    #[error("No navigation target for path: {0}")]
    UnknownPath(String),

    /// The unit factory cannot build a unit for the intent
    #[error("Unit factory cannot create a unit for {0}")]
    UnknownIntent(String),
}

// ============================================================================
// Tests
// ============================================================================
