//! Undo and redo stacks plus per-document change counters

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use crate::action::HistoryEntry;
use crate::error::{HistoryError, Result};
use crate::manager::Revertable;
use crate::register::{Document, Register};

/// Which of the two stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// Entries that can be undone
    Undoable,
    /// Entries that can be redone
    Redoable,
}

impl StackKind {
    /// Stack where an action registered under `register` is placed
    pub fn destination(register: Register) -> StackKind {
        match register.single() {
            Register::Undo => StackKind::Redoable,
            // A redone action can itself be undone.
            _ => StackKind::Undoable,
        }
    }

    /// Stack holding the entries reverted under `register`
    pub fn source(register: Register) -> Result<StackKind> {
        match register.single() {
            Register::Undo => Ok(StackKind::Undoable),
            Register::Redo => Ok(StackKind::Redoable),
            _ => Err(HistoryError::InvalidRegister(register)),
        }
    }
}

/// The two history stacks, most recent entry first
pub struct HistoryStacks<T: Revertable> {
    undoables: VecDeque<HistoryEntry<T>>,
    redoables: VecDeque<HistoryEntry<T>>,
    undo_limit: Option<usize>,
}

impl<T: Revertable> HistoryStacks<T> {
    /// Create empty stacks with an optional depth limit
    pub fn new(undo_limit: Option<usize>) -> Self {
        Self {
            undoables: VecDeque::new(),
            redoables: VecDeque::new(),
            undo_limit,
        }
    }

    /// Depth limit, `None` for unbounded
    pub fn undo_limit(&self) -> Option<usize> {
        self.undo_limit
    }

    /// Change the depth limit, discarding the oldest undoable entries
    pub fn set_undo_limit(&mut self, undo_limit: Option<usize>) {
        self.undo_limit = undo_limit;
        self.enforce_limit(StackKind::Undoable);
    }

    /// Shared view of one stack
    pub fn stack(&self, kind: StackKind) -> &VecDeque<HistoryEntry<T>> {
        match kind {
            StackKind::Undoable => &self.undoables,
            StackKind::Redoable => &self.redoables,
        }
    }

    pub(crate) fn stack_mut(&mut self, kind: StackKind) -> &mut VecDeque<HistoryEntry<T>> {
        match kind {
            StackKind::Undoable => &mut self.undoables,
            StackKind::Redoable => &mut self.redoables,
        }
    }

    /// Most recent entry of one stack
    pub fn front(&self, kind: StackKind) -> Option<&HistoryEntry<T>> {
        self.stack(kind).front()
    }

    /// Number of logical entries on one stack
    pub fn len(&self, kind: StackKind) -> usize {
        self.stack(kind).len()
    }

    /// Whether one stack is empty
    pub fn is_empty(&self, kind: StackKind) -> bool {
        self.stack(kind).is_empty()
    }

    /// Push an entry and enforce the depth limit on that stack
    pub(crate) fn push(&mut self, kind: StackKind, entry: HistoryEntry<T>) {
        self.stack_mut(kind).push_front(entry);
        self.enforce_limit(kind);
    }

    pub(crate) fn pop(&mut self, kind: StackKind) -> Option<HistoryEntry<T>> {
        self.stack_mut(kind).pop_front()
    }

    pub(crate) fn clear(&mut self, kind: StackKind) {
        self.stack_mut(kind).clear();
    }

    fn enforce_limit(&mut self, kind: StackKind) {
        let Some(limit) = self.undo_limit else {
            return;
        };
        let stack = self.stack_mut(kind);
        if stack.len() > limit {
            debug!(
                discarded = stack.len() - limit,
                limit, "Discarding oldest history entries"
            );
            stack.truncate(limit);
        }
    }

    /// Labels of one stack, most recent first
    pub fn descriptions(&self, kind: StackKind) -> Vec<String> {
        self.stack(kind)
            .iter()
            .map(|entry| entry.description().to_string())
            .collect()
    }
}

/// Net number of unsaved changes per document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounters {
    /// Changes to the main document
    pub main_changed: i64,
    /// Changes to the translation document
    pub tran_changed: i64,
    /// Set once an action touching only the translation is registered
    pub tran_active: bool,
}

impl ChangeCounters {
    /// Shift counters of every document in `docs`
    pub fn shift<'a>(&mut self, docs: impl IntoIterator<Item = &'a Document>, shift: i64) {
        let mut main = false;
        let mut tran = false;
        for doc in docs {
            match doc {
                Document::Main => main = true,
                Document::Translation => tran = true,
            }
        }
        if main {
            self.main_changed += shift;
        }
        if tran {
            self.tran_changed += shift;
            if !main {
                self.tran_active = true;
            }
        }
    }

    /// Counter of one document
    pub fn get(&self, doc: Document) -> i64 {
        match doc {
            Document::Main => self.main_changed,
            Document::Translation => self.tran_changed,
        }
    }

    /// Reset one document's counter, typically after saving it
    pub fn reset(&mut self, doc: Document) {
        match doc {
            Document::Main => self.main_changed = 0,
            Document::Translation => self.tran_changed = 0,
        }
    }
}
