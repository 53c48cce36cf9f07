//! Bounded undo/redo stack of layout snapshots.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::MAX_HISTORY;

/// Linear history with a cursor. Pushing after an undo drops the redo tail.
#[derive(Clone, Debug)]
pub struct History<T: Clone> {
    stack: Vec<T>,
    cursor: usize,
    limit: usize,
}

impl<T: Clone> History<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, MAX_HISTORY)
    }

    /// A history that keeps at most `limit` snapshots (minimum 1).
    #[must_use]
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self { stack: vec![initial], cursor: 0, limit: limit.max(1) }
    }

    pub fn push(&mut self, value: T) {
        self.stack.truncate(self.cursor + 1);
        self.stack.push(value);
        if self.stack.len() > self.limit {
            let excess = self.stack.len() - self.limit;
            self.stack.drain(..excess);
        }
        self.cursor = self.stack.len() - 1;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.stack.len()
    }

    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.stack.get(self.cursor).cloned()
    }

    pub fn redo(&mut self) -> Option<T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.stack.get(self.cursor).cloned()
    }

    /// Forget everything and start over from `value`.
    pub fn reset(&mut self, value: T) {
        self.stack.clear();
        self.stack.push(value);
        self.cursor = 0;
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
