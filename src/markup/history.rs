//! Undo/redo history of raster snapshots.
//!
//! Maintains two stacks:
//! - `undo_stack`: surface states before each gesture (most recent at the end)
//! - `redo_stack`: surface states that were undone (most recent at the end)
//!
//! A new gesture pushes onto `undo_stack` and clears `redo_stack`. Undo
//! swaps the current surface onto `redo_stack`; redo swaps it back.

use super::surface::Snapshot;
use crate::constants::MARKUP_HISTORY_LIMIT;

/// Bounded snapshot history.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::with_limit(MARKUP_HISTORY_LIMIT)
    }
}

impl SnapshotHistory {
    /// Create an empty history holding at most `limit` undo steps.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Maximum number of undo steps kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the surface state before a gesture.
    /// This clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        log::debug!("Markup history: pushed ({} steps)", self.undo_stack.len());
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Take the snapshot to restore for an undo, parking `current` for redo.
    pub fn pop_undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        log::debug!("Markup history: undo ({} left)", self.undo_stack.len());
        Some(previous)
    }

    /// Take the snapshot to restore for a redo, parking `current` for undo.
    pub fn pop_redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        log::debug!("Markup history: redo ({} left)", self.redo_stack.len());
        Some(next)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Markup history cleared");
    }

    /// Number of undo steps available
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps available
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::surface::MarkupSurface;

    fn snap(w: u32) -> Snapshot {
        MarkupSurface::new(w, 1).unwrap().snapshot()
    }

    #[test]
    fn test_push_and_undo() {
        let mut h = SnapshotHistory::default();
        assert!(!h.can_undo());
        h.push(snap(1));
        h.push(snap(2));
        let restored = h.pop_undo(snap(3)).unwrap();
        assert_eq!(restored.width(), 2);
        assert!(h.can_redo());
        assert_eq!(h.undo_count(), 1);
    }

    #[test]
    fn test_redo_returns_parked_state() {
        let mut h = SnapshotHistory::default();
        h.push(snap(1));
        let _ = h.pop_undo(snap(7)).unwrap();
        let redone = h.pop_redo(snap(1)).unwrap();
        assert_eq!(redone.width(), 7);
        assert_eq!(h.undo_count(), 1);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut h = SnapshotHistory::default();
        h.push(snap(1));
        let _ = h.pop_undo(snap(2));
        assert_eq!(h.redo_count(), 1);
        h.push(snap(3));
        assert_eq!(h.redo_count(), 0);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut h = SnapshotHistory::default();
        for i in 1..=25 {
            h.push(snap(i));
        }
        assert_eq!(h.undo_count(), 20);
        let mut last = 0;
        while let Some(s) = h.pop_undo(snap(100)) {
            last = s.width();
        }
        assert_eq!(last, 6);
    }

    #[test]
    fn test_empty_pops_are_none() {
        let mut h = SnapshotHistory::with_limit(3);
        assert!(h.pop_undo(snap(1)).is_none());
        assert!(h.pop_redo(snap(1)).is_none());
        assert_eq!(h.redo_count(), 0);
    }
}
