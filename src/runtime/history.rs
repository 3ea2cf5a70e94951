//! Undo/redo history
//!
//! Stores whole-tree snapshots. Each state of the tree carries a revision
//! number, so the editor can tell whether the current state is the one that
//! was last saved even after undoing back to it.

use std::collections::VecDeque;

use crate::core::BlockTree;

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<(BlockTree, u64)>,
    future: Vec<(BlockTree, u64)>,
    limit: usize,
    revision: u64,
    next_revision: u64,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
            revision: 0,
            next_revision: 1,
        }
    }

    /// Revision of the current tree state
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record that the tree is about to change from `before`. Returns the
    /// revision of the new state. Clears the redo stack.
    pub fn record(&mut self, before: BlockTree) -> u64 {
        self.past.push_back((before, self.revision));
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        self.revision = self.next_revision;
        self.next_revision += 1;
        self.revision
    }

    /// Step back. `current` is the state being left; it becomes redoable.
    pub fn undo(&mut self, current: &BlockTree) -> Option<BlockTree> {
        let (tree, revision) = self.past.pop_back()?;
        self.future.push((current.clone(), self.revision));
        self.revision = revision;
        Some(tree)
    }

    pub fn redo(&mut self, current: &BlockTree) -> Option<BlockTree> {
        let (tree, revision) = self.future.pop()?;
        self.past.push_back((current.clone(), self.revision));
        self.revision = revision;
        Some(tree)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Forget everything, e.g. after loading a page. The fresh state gets a
    /// new revision.
    pub fn reset(&mut self) -> u64 {
        self.past.clear();
        self.future.clear();
        self.revision = self.next_revision;
        self.next_revision += 1;
        self.revision
    }
}
