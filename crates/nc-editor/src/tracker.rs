//! Re-entrancy guard for translations.
//!
//! A frame moving its linked nodes makes those nodes report that they moved,
//! and a moved node makes its frame re-fit itself. Without a guard the two
//! reactions feed each other forever. The tracker keeps a count of in-flight
//! translations per entity so a reaction can tell "this move is a side effect
//! of my own pending translation" and skip it.
//!
//! The count is raised by [`TranslationTracker::begin`] before the move is
//! performed and lowered by [`TranslationTracker::finish`] after every
//! reaction to it has run.

use nc_core::{CommentId, NodeId};
use std::collections::HashMap;

/// An entity whose translations are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracked {
    Node(NodeId),
    Comment(CommentId),
}

/// Proof that a translation is in flight. Hand it back to
/// [`TranslationTracker::finish`] once the move and its reactions completed.
#[must_use = "an unfinished translation keeps its entity marked as translating"]
#[derive(Debug)]
pub struct TrackedMove {
    target: Tracked,
}

impl TrackedMove {
    pub fn target(&self) -> Tracked {
        self.target
    }
}

#[derive(Debug, Default)]
pub struct TranslationTracker {
    active: HashMap<Tracked, usize>,
    calls: HashMap<Tracked, usize>,
}

impl TranslationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `target` as translating by (dx, dy).
    ///
    /// A zero delta is a pure no-op: nothing is counted and `None` is
    /// returned, so the caller performs no move and triggers no reactions.
    pub fn begin(&mut self, target: Tracked, dx: f64, dy: f64) -> Option<TrackedMove> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        *self.active.entry(target).or_insert(0) += 1;
        *self.calls.entry(target).or_insert(0) += 1;
        Some(TrackedMove { target })
    }

    pub fn finish(&mut self, token: TrackedMove) {
        if let Some(count) = self.active.get_mut(&token.target) {
            *count -= 1;
            if *count == 0 {
                self.active.remove(&token.target);
            }
        }
    }

    pub fn is_translating(&self, target: Tracked) -> bool {
        self.active.get(&target).is_some_and(|n| *n > 0)
    }

    /// Frames re-fit themselves through a tracked translation, so "resizing"
    /// and "translating" share one count.
    pub fn is_resizing(&self, target: Tracked) -> bool {
        self.is_translating(target)
    }

    /// Number of translations currently in flight for `target`.
    pub fn depth(&self, target: Tracked) -> usize {
        self.active.get(&target).copied().unwrap_or(0)
    }

    /// Total number of tracked translations ever started for `target`.
    pub fn calls(&self, target: Tracked) -> usize {
        self.calls.get(&target).copied().unwrap_or(0)
    }

    /// Drop all bookkeeping for an entity that no longer exists.
    pub fn forget(&mut self, target: Tracked) {
        self.active.remove(&target);
        self.calls.remove(&target);
    }
}
