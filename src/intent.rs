//! Navigation intents and deep-link resolution.
//!
//! A [`NavigationIntent`] names *what* the rider wants to see, independent of
//! which concrete unit type shows it. The [`UnitFactory`](crate::UnitFactory)
//! turns intents into units.
//!
//! [`IntentRouter`] maps deep-link paths onto intents using `matchit`:
//!
//! | Path | Intent |
//! |------|--------|
//! | `/`, `/home` | [`Home`](NavigationIntent::Home) |
//! | `/profile` | [`Profile`](NavigationIntent::Profile) |
//! | `/tools/{id}` | [`Tool`](NavigationIntent::Tool) |
//! | `/help/{topic}` | [`Help`](NavigationIntent::Help) |
//!
//! Anything after `?` becomes [`NavigationParams`].

use crate::params::NavigationParams;
use std::fmt;

/// Product-level navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavigationIntent {
    /// Landing page
    Home,
    /// Rider profile
    Profile,
    /// A calculator tool, by id (`chain-length`, `gear-ratio`, `spoke-length`, ...)
    Tool(String),
    /// A help topic, by id
    Help(String),
}

impl NavigationIntent {
    /// Canonical deep-link path of this intent.
    ///
    /// # Example
    ///
    /// ```
    /// use bikecalc_navigator::NavigationIntent;
    ///
    /// assert_eq!(NavigationIntent::Tool("gear-ratio".into()).path(), "/tools/gear-ratio");
    /// ```
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/home".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Tool(id) => format!("/tools/{}", id),
            Self::Help(topic) => format!("/help/{}", topic),
        }
    }
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Profile => write!(f, "profile"),
            Self::Tool(id) => write!(f, "tool '{}'", id),
            Self::Help(topic) => write!(f, "help '{}'", topic),
        }
    }
}

/// A deep link resolved into an intent plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub intent: NavigationIntent,
    pub params: NavigationParams,
}

#[derive(Debug, Clone, Copy)]
enum IntentKind {
    Home,
    Profile,
    Tool,
    Help,
}

const INTENT_ROUTES: &[(&str, IntentKind)] = &[
    ("/", IntentKind::Home),
    ("/home", IntentKind::Home),
    ("/profile", IntentKind::Profile),
    ("/tools/{id}", IntentKind::Tool),
    ("/help/{topic}", IntentKind::Help),
];

/// Resolves deep-link paths into [`NavigationIntent`]s.
pub struct IntentRouter {
    router: matchit::Router<IntentKind>,
}

impl IntentRouter {
    /// Router with the built-in intent table.
    pub fn new() -> Self {
        let mut router = matchit::Router::new();
        for (pattern, kind) in INTENT_ROUTES {
            router
                .insert(*pattern, *kind)
                .expect("built-in intent patterns do not conflict");
        }
        Self { router }
    }

    /// Resolve `path` (optionally with a `?query`). Returns `None` for unknown paths.
    ///
    /// # Example
    ///
    /// ```
    /// use bikecalc_navigator::{IntentRouter, NavigationIntent};
    ///
    /// let router = IntentRouter::new();
    /// let resolved = router.resolve("/tools/spoke-length?erd=601").unwrap();
    /// assert_eq!(resolved.intent, NavigationIntent::Tool("spoke-length".into()));
    /// assert_eq!(resolved.params.get("erd"), Some("601"));
    /// ```
    pub fn resolve(&self, path: &str) -> Option<ResolvedPath> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path, ""),
        };
        let normalized = normalize_path(path);

        let matched = self.router.at(&normalized).ok()?;
        let intent = match matched.value {
            IntentKind::Home => NavigationIntent::Home,
            IntentKind::Profile => NavigationIntent::Profile,
            IntentKind::Tool => NavigationIntent::Tool(matched.params.get("id")?.to_string()),
            IntentKind::Help => NavigationIntent::Help(matched.params.get("topic")?.to_string()),
        };

        Some(ResolvedPath {
            intent,
            params: NavigationParams::from_query_string(query),
        })
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Ensure a leading slash and drop trailing ones (except for the root).
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}
