//! Session history: the applied/undone change stacks shared by the topic
//! and subtopic-page editors.

use crate::apply::ApplicableChange;
use crate::error::HistoryError;

/// Linear undo/redo over recorded changes. Recording a new change discards
/// the redo stack. A change that fails to revert stays on the applied stack
/// so the cursor never moves on error.
#[derive(Debug)]
pub struct HistoryStack<C> {
    applied: Vec<C>,
    undone: Vec<C>,
}

impl<C> HistoryStack<C> {
    pub fn new() -> Self {
        Self {
            applied: Vec::new(),
            undone: Vec::new(),
        }
    }

    /// Changes currently applied, oldest first.
    pub fn applied_changes(&self) -> &[C] {
        &self.applied
    }

    pub fn change_count(&self) -> usize {
        self.applied.len()
    }

    pub fn has_changes(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Forget all history, applied and undone. The target document keeps
    /// its current state.
    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    /// Apply a fresh change and push it onto the applied stack.
    pub fn record<T>(&mut self, change: C, target: &mut T) -> Result<(), HistoryError>
    where
        C: ApplicableChange<T>,
    {
        change.apply(target)?;
        self.undone.clear();
        self.applied.push(change);
        tracing::trace!(applied = self.applied.len(), "recorded change");
        Ok(())
    }

    pub fn undo<T>(&mut self, target: &mut T) -> Result<(), HistoryError>
    where
        C: ApplicableChange<T>,
    {
        let change = self.applied.pop().ok_or(HistoryError::NothingToUndo)?;
        if let Err(err) = change.revert(target) {
            self.applied.push(change);
            return Err(err.into());
        }
        self.undone.push(change);
        Ok(())
    }

    pub fn redo<T>(&mut self, target: &mut T) -> Result<(), HistoryError>
    where
        C: ApplicableChange<T>,
    {
        let change = self.undone.pop().ok_or(HistoryError::NothingToRedo)?;
        if let Err(err) = change.apply(target) {
            self.undone.push(change);
            return Err(err.into());
        }
        self.applied.push(change);
        Ok(())
    }
}

impl<C> Default for HistoryStack<C> {
    fn default() -> Self {
        Self::new()
    }
}
