//! Navigation stack state.
//!
//! [`NavigationStack`] keeps two collections behind one lock:
//!
//! - the **stack** of tracked units, whose head is the active unit;
//! - the **untracked** bag of units that left the stack (pop or clear) and
//!   still wait for a cleanup attempt.
//!
//! Moving a unit from one to the other happens under the same lock, so no
//! reader can observe a unit missing from both. The lock is never held across
//! an `.await`.

use crate::lifecycle::RoutableUnit;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of one stack entry.
///
/// Pushing the same unit twice produces two entries with distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u64);

impl UnitId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit as tracked by the stack, with its cleanup claim.
///
/// Clones share the claim, so whichever cleanup path claims first wins.
#[derive(Clone)]
pub struct TrackedUnit {
    id: UnitId,
    unit: Arc<dyn RoutableUnit>,
    cleaned: Arc<AtomicBool>,
}

impl TrackedUnit {
    fn new(id: UnitId, unit: Arc<dyn RoutableUnit>) -> Self {
        Self {
            id,
            unit,
            cleaned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Entry id.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The wrapped unit.
    pub fn unit(&self) -> &Arc<dyn RoutableUnit> {
        &self.unit
    }

    /// Return `true` once a cleanup protocol has claimed this entry.
    pub fn is_cleaned(&self) -> bool {
        self.cleaned.load(Ordering::Acquire)
    }

    /// Claim the entry for cleanup. Returns `false` if it was already claimed.
    pub(crate) fn claim(&self) -> bool {
        !self.cleaned.swap(true, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for TrackedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedUnit")
            .field("id", &self.id)
            .field("name", &self.unit.name())
            .field("cleaned", &self.is_cleaned())
            .finish()
    }
}

#[derive(Default)]
struct StackState {
    /// Tracked units, bottom first.
    items: Vec<TrackedUnit>,
    /// Units awaiting cleanup, in the order they left the stack.
    untracked: Vec<TrackedUnit>,
}

/// Thread-safe LIFO of routable units with a side bag of units pending cleanup.
#[derive(Default)]
pub struct NavigationStack {
    state: Mutex<StackState>,
    next_id: AtomicU64,
}

impl NavigationStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `unit` as the new head. No validation happens at this layer.
    pub fn push(&self, unit: Arc<dyn RoutableUnit>) -> UnitId {
        let id = UnitId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.state.lock().items.push(TrackedUnit::new(id, unit));
        id
    }

    /// Remove the head and move it to the untracked bag.
    ///
    /// Returns `None` on an empty stack.
    pub fn pop(&self) -> Option<TrackedUnit> {
        let mut state = self.state.lock();
        let popped = state.items.pop()?;
        state.untracked.push(popped.clone());
        Some(popped)
    }

    /// Move every tracked unit to the untracked bag, head first.
    pub fn clear(&self) -> Vec<TrackedUnit> {
        let mut state = self.state.lock();
        let mut moved: Vec<TrackedUnit> = state.items.drain(..).collect();
        moved.reverse();
        state.untracked.extend(moved.iter().cloned());
        moved
    }

    /// Empty the untracked bag.
    pub fn clear_untracked(&self) {
        self.state.lock().untracked.clear();
    }

    /// Remove one entry from the untracked bag. Returns `false` if it was not there.
    pub fn release_untracked(&self, id: UnitId) -> bool {
        let mut state = self.state.lock();
        match state.untracked.iter().position(|u| u.id == id) {
            Some(index) => {
                state.untracked.remove(index);
                true
            }
            None => false,
        }
    }

    /// Snapshot of tracked units, head (active) first.
    pub fn items(&self) -> Vec<Arc<dyn RoutableUnit>> {
        self.state
            .lock()
            .items
            .iter()
            .rev()
            .map(|u| Arc::clone(&u.unit))
            .collect()
    }

    /// Snapshot of untracked units, oldest first.
    pub fn untracked(&self) -> Vec<Arc<dyn RoutableUnit>> {
        self.state
            .lock()
            .untracked
            .iter()
            .map(|u| Arc::clone(&u.unit))
            .collect()
    }

    /// Snapshot of untracked entries, used by the eviction pass.
    pub fn pending(&self) -> Vec<TrackedUnit> {
        self.state.lock().untracked.clone()
    }

    /// The active unit, if any.
    pub fn active(&self) -> Option<Arc<dyn RoutableUnit>> {
        self.state.lock().items.last().map(|u| Arc::clone(&u.unit))
    }

    /// Number of tracked units.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Return `true` if no unit is tracked.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Number of untracked entries.
    pub fn untracked_len(&self) -> usize {
        self.state.lock().untracked.len()
    }
}

impl std::fmt::Debug for NavigationStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("NavigationStack")
            .field("items", &state.items)
            .field("untracked", &state.untracked)
            .finish_non_exhaustive()
    }
}
