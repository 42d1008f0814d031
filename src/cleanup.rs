//! Cleanup protocols for units that left the stack.
//!
//! Two protocols tear units down:
//!
//! | Protocol | Trigger | Hook |
//! |----------|---------|------|
//! | Graceful | immediately after pop / clear | [`on_destroy`](crate::RoutableUnit::on_destroy) |
//! | Forced | every tick of the [`EvictionWorker`] | [`on_force_destroy`](crate::RoutableUnit::on_force_destroy) |
//!
//! Both call [`dispose`](crate::RoutableUnit::dispose) after the hook, even if
//! the hook failed. Each stack entry carries a claim flag: the first protocol
//! to claim an entry runs, the other one reports [`CleanupOutcome::Skipped`].
//! An entry is therefore destroyed and disposed exactly once, even when the
//! worker races a pop.
//!
//! The entry is released from the untracked bag by whichever protocol cleaned
//! it, after the attempt.

use crate::lifecycle::RoutableUnit;
use crate::stack::{NavigationStack, TrackedUnit};
use crate::{debug_log, info_log, trace_log, warn_log};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Which protocol is tearing a unit down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupKind {
    /// `on_destroy` + `dispose`, right after the unit left the stack
    Graceful,
    /// `on_force_destroy` + `dispose`, from the eviction worker
    Forced,
}

/// Result of one cleanup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Hook succeeded, unit disposed
    Completed,
    /// Hook failed and was logged, unit disposed anyway
    HookFailed,
    /// Another protocol already claimed the unit; nothing was called
    Skipped,
}

/// What a graceful cleanup releases from the untracked bag afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupScope {
    /// Release only the cleaned entry.
    #[default]
    Unit,
    /// Empty the whole untracked bag after cleaning one entry.
    ///
    /// Other pending entries are dropped without ever being cleaned. Kept only
    /// for hosts that depend on the old single-pending-unit behavior.
    AllPending,
}

/// Run one cleanup protocol on `entry`, unless it was already claimed.
pub async fn run_cleanup(entry: &TrackedUnit, kind: CleanupKind) -> CleanupOutcome {
    if !entry.claim() {
        trace_log!(
            "{:?} cleanup of '{}' {} skipped: already claimed",
            kind,
            entry.unit().name(),
            entry.id()
        );
        return CleanupOutcome::Skipped;
    }

    let unit: &dyn RoutableUnit = entry.unit().as_ref();
    let hook = match kind {
        CleanupKind::Graceful => unit.on_destroy().await,
        CleanupKind::Forced => unit.on_force_destroy().await,
    };

    let outcome = match hook {
        Ok(()) => CleanupOutcome::Completed,
        Err(err) => {
            warn_log!(
                "{:?} cleanup hook failed for '{}' {}: {}",
                kind,
                unit.name(),
                entry.id(),
                err
            );
            CleanupOutcome::HookFailed
        }
    };
    unit.dispose();

    debug_log!(
        "{:?} cleanup of '{}' {} → {:?}",
        kind,
        unit.name(),
        entry.id(),
        outcome
    );
    outcome
}

/// Graceful cleanup of an entry that just left `stack`.
pub async fn graceful_cleanup(
    stack: &NavigationStack,
    entry: &TrackedUnit,
    scope: CleanupScope,
) -> CleanupOutcome {
    let outcome = run_cleanup(entry, CleanupKind::Graceful).await;
    match scope {
        CleanupScope::Unit => {
            if outcome != CleanupOutcome::Skipped {
                stack.release_untracked(entry.id());
            }
        }
        CleanupScope::AllPending => stack.clear_untracked(),
    }
    outcome
}

/// Tally of one eviction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Units force-cleaned successfully.
    pub completed: usize,
    /// Units whose `on_force_destroy` failed (still disposed).
    pub failed: usize,
    /// Entries already claimed by a graceful cleanup in flight.
    pub skipped: usize,
}

impl EvictionReport {
    /// Number of units this pass actually tore down.
    pub fn cleaned(&self) -> usize {
        self.completed + self.failed
    }

    /// Return `true` if the pass found nothing to do.
    pub fn is_empty(&self) -> bool {
        self.cleaned() == 0 && self.skipped == 0
    }
}

/// Force-clean every entry currently in the untracked bag.
pub async fn evict_pending(stack: &NavigationStack) -> EvictionReport {
    let mut report = EvictionReport::default();
    for entry in stack.pending() {
        match run_cleanup(&entry, CleanupKind::Forced).await {
            CleanupOutcome::Completed => report.completed += 1,
            CleanupOutcome::HookFailed => report.failed += 1,
            CleanupOutcome::Skipped => {
                report.skipped += 1;
                continue;
            }
        }
        stack.release_untracked(entry.id());
    }
    report
}

// ============================================================================
// EvictionWorker
// ============================================================================

/// Background task running [`evict_pending`] on a fixed period.
///
/// The first pass runs one full period after spawning. Stopping is
/// cooperative: a pass in progress finishes before the task exits.
#[derive(Debug)]
pub struct EvictionWorker {
    shutdown_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    period: Duration,
}

impl EvictionWorker {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime.
    pub fn spawn(stack: Arc<NavigationStack>, period: Duration) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let period = period.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = runtime.spawn(async move {
            info_log!("Eviction worker started (period {:?})", period);
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let report = evict_pending(&stack).await;
                        if !report.is_empty() {
                            debug_log!("Eviction pass: {:?}", report);
                        }
                    }
                }
            }
            info_log!("Eviction worker stopped");
        });

        Some(Self {
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
            period,
        })
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Return `true` while the task is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the task to stop after any pass in progress.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Signal the task to stop and wait for it to exit.
    pub async fn stop_and_wait(&self) {
        self.stop();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for EvictionWorker {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

// ============================================================================
// Tests
// ============================================================================
