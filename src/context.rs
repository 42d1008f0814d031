//! Per-call navigation context.
//!
//! A [`NavigationContext`] is created fresh for every navigation call and is
//! handed by reference to the guards. It is never mutated after construction
//! and is dropped when the call completes.
//!
//! # Example
//!
//! ```
//! use bikecalc_navigator::{NavigationContext, NavigationParams};
//!
//! let context = NavigationContext::new()
//!     .with_source("home")
//!     .with_params(NavigationParams::new().with("tool", "chain-length"));
//!
//! assert_eq!(context.source(), Some("home"));
//! assert_eq!(context.params().get("tool"), Some("chain-length"));
//! ```

use crate::params::NavigationParams;
use std::time::SystemTime;

/// Immutable description of a single navigation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    params: NavigationParams,
    source: Option<String>,
    created_at: SystemTime,
}

impl NavigationContext {
    /// Create an empty context stamped with the current time.
    pub fn new() -> Self {
        Self {
            params: NavigationParams::new(),
            source: None,
            created_at: SystemTime::now(),
        }
    }

    /// Set the parameters.
    #[must_use]
    pub fn with_params(mut self, params: NavigationParams) -> Self {
        self.params = params;
        self
    }

    /// Set the identifier of whatever initiated the navigation.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Parameters attached to this call.
    pub fn params(&self) -> &NavigationParams {
        &self.params
    }

    /// Source identifier, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// When this context was created.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}
