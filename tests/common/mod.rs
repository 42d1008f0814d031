//! Test utilities for navigation tests
//!
//! Provides recording units, a recording observer and a factory wired to a
//! shared call journal, so tests can assert the exact order of hooks and
//! notifications.

#![allow(dead_code)]

use async_trait::async_trait;
use bikecalc_navigator::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Initialize env_logger once; `RUST_LOG=debug cargo test` shows handler logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Ordered record of hook calls and notifications, shared between units and observers.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| *e == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e == entry)
    }
}

/// Unit that journals every hook call as `"<hook>:<segment>"`.
pub struct RecordingUnit {
    segment: String,
    journal: Journal,
    fail_init: bool,
    fail_destroy: bool,
    fail_force_destroy: bool,
    yield_in_destroy: bool,
    disposals: AtomicUsize,
}

impl RecordingUnit {
    pub fn new(segment: &str, journal: &Journal) -> Self {
        Self {
            segment: segment.to_string(),
            journal: journal.clone(),
            fail_init: false,
            fail_destroy: false,
            fail_force_destroy: false,
            yield_in_destroy: false,
            disposals: AtomicUsize::new(0),
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    pub fn failing_force_destroy(mut self) -> Self {
        self.fail_force_destroy = true;
        self
    }

    /// Suspend once inside `on_destroy`, letting concurrent work run.
    pub fn yielding_destroy(mut self) -> Self {
        self.yield_in_destroy = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    fn hook(&self, hook: &str, fail: bool) -> HookResult {
        self.journal.record(format!("{}:{}", hook, self.segment));
        if fail {
            Err(format!("{} failed for {}", hook, self.segment).into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RoutableUnit for RecordingUnit {
    fn name(&self) -> &str {
        &self.segment
    }

    fn path_segment(&self) -> &str {
        &self.segment
    }

    async fn on_initialized(&self) -> HookResult {
        self.hook("init", self.fail_init)
    }

    async fn on_resume(&self) -> HookResult {
        self.hook("resume", false)
    }

    async fn on_destroy(&self) -> HookResult {
        if self.yield_in_destroy {
            tokio::task::yield_now().await;
        }
        self.hook("destroy", self.fail_destroy)
    }

    async fn on_force_destroy(&self) -> HookResult {
        self.hook("force", self.fail_force_destroy)
    }

    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        self.journal.record(format!("dispose:{}", self.segment));
    }
}

/// Shorthand for a type-erased recording unit.
pub fn unit(segment: &str, journal: &Journal) -> Arc<dyn RoutableUnit> {
    RecordingUnit::new(segment, journal).shared()
}

/// Observer that journals `"changing:<from>-><to>"` / `"changed:<from>-><to>"`.
pub struct RecordingObserver {
    journal: Journal,
}

impl RecordingObserver {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }

    fn describe(event: &NavigationEvent) -> String {
        format!(
            "{}->{}",
            event.from.as_deref().unwrap_or("_"),
            event.to.as_deref().unwrap_or("_")
        )
    }
}

impl NavigationObserver for RecordingObserver {
    fn on_changing(&self, event: &NavigationEvent) {
        self.journal
            .record(format!("changing:{}", Self::describe(event)));
    }

    fn on_changed(&self, event: &NavigationEvent) {
        self.journal
            .record(format!("changed:{}", Self::describe(event)));
    }

    fn name(&self) -> &'static str {
        "RecordingObserver"
    }
}

/// Factory mapping intents to recording units:
/// `home`, `profile`, `tool-<id>`, `help-<id>`.
pub struct RecordingFactory {
    journal: Journal,
    created: Arc<AtomicUsize>,
}

impl RecordingFactory {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

pub fn segment_for(intent: &NavigationIntent) -> String {
    match intent {
        NavigationIntent::Home => "home".to_string(),
        NavigationIntent::Profile => "profile".to_string(),
        NavigationIntent::Tool(id) => format!("tool-{}", id),
        NavigationIntent::Help(id) => format!("help-{}", id),
    }
}

impl UnitFactory for RecordingFactory {
    fn create(
        &self,
        intent: &NavigationIntent,
        _navigator: &NavigationService,
    ) -> Result<Arc<dyn RoutableUnit>, NavigationError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(unit(&segment_for(intent), &self.journal))
    }
}

/// Configuration without a background worker, for deterministic tests.
pub fn offline_config() -> NavigatorConfig {
    NavigatorConfig::new().without_eviction_worker()
}

/// Path segments of `items`, active first.
pub fn segments(items: &[Arc<dyn RoutableUnit>]) -> Vec<String> {
    items.iter().map(|u| u.path_segment().to_string()).collect()
}
