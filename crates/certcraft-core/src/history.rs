//! Linear undo/redo over full snapshots of the element sequence.

use crate::elements::Element;
use std::sync::Arc;

/// A complete copy of the element sequence at one point in history.
///
/// Shared behind an [`Arc`] so handing the current state to a renderer, or
/// keeping the same state in several places, does not copy the elements.
pub type Snapshot = Arc<[Element]>;

/// Snapshot history with a cursor.
///
/// Always holds at least one entry, and the entry at `cursor` is the state
/// currently displayed. Entries after the cursor form the redo tail.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    /// Maximum number of entries kept, oldest dropped first.
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Unbounded history starting from the empty document.
    pub fn new() -> Self {
        Self::with_initial(Vec::new())
    }

    /// Unbounded history starting from the given state.
    pub fn with_initial(elements: Vec<Element>) -> Self {
        Self {
            entries: vec![Snapshot::from(elements)],
            cursor: 0,
            limit: None,
        }
    }

    /// Cap the number of retained entries. Values below 1 are treated as 1.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.enforce_limit();
        self
    }

    /// The state at the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: there is always a current entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record a new state, discarding the redo tail.
    pub fn commit(&mut self, elements: impl Into<Snapshot>) {
        let discarded = self.entries.len() - (self.cursor + 1);
        if discarded > 0 {
            log::debug!("Discarding {discarded} redo entries");
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(elements.into());
        self.cursor = self.entries.len() - 1;
        self.enforce_limit();
        log::debug!("Committed history entry {} of {}", self.cursor + 1, self.entries.len());
    }

    /// Step back. Returns the state now current, or `None` at the start.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            log::info!("Nothing to undo");
            return None;
        }
        self.cursor -= 1;
        Some(self.current().clone())
    }

    /// Step forward. Returns the state now current, or `None` at the tail.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            log::info!("Nothing to redo");
            return None;
        }
        self.cursor += 1;
        Some(self.current().clone())
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.entries.len() > limit {
            // Prefer dropping from the front; only cut the redo tail when the
            // cursor itself would fall off.
            let excess = (self.entries.len() - limit).min(self.cursor);
            self.entries.drain(..excess);
            self.cursor -= excess;
            self.entries.truncate(limit.max(self.cursor + 1));
        }
    }
}
