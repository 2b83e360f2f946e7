//! Revertable actions, action groups and row deltas

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{HistoryError, Result};
use crate::manager::Revertable;
use crate::register::{Document, Register};

/// Procedure that reverts one action
///
/// Called with the target and the register the inverse action must be
/// recorded under. Its last step is expected to register that inverse.
pub type RevertFn<T> =
    Box<dyn FnOnce(&mut T, Register) -> std::result::Result<(), <T as Revertable>::Error>>;

/// Sort and deduplicate row indices
pub fn sorted_unique(rows: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut rows: Vec<usize> = rows.into_iter().collect();
    rows.sort_unstable();
    rows.dedup();
    rows
}

/// Rows inserted, removed or updated by one action
///
/// Every list is kept strictly ascending without duplicates. The four
/// updated-row categories are tracked separately so that observers can
/// refresh only the affected cell class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowChanges {
    inserted_rows: Vec<usize>,
    removed_rows: Vec<usize>,
    updated_rows: Vec<usize>,
    updated_positions: Vec<usize>,
    updated_main_texts: Vec<usize>,
    updated_tran_texts: Vec<usize>,
}

impl RowChanges {
    /// Empty row delta
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows inserted
    pub fn inserted_rows(&self) -> &[usize] {
        &self.inserted_rows
    }

    /// Rows removed
    pub fn removed_rows(&self) -> &[usize] {
        &self.removed_rows
    }

    /// Rows with generic updates
    pub fn updated_rows(&self) -> &[usize] {
        &self.updated_rows
    }

    /// Rows with updated times or frames
    pub fn updated_positions(&self) -> &[usize] {
        &self.updated_positions
    }

    /// Rows with updated main texts
    pub fn updated_main_texts(&self) -> &[usize] {
        &self.updated_main_texts
    }

    /// Rows with updated translation texts
    pub fn updated_tran_texts(&self) -> &[usize] {
        &self.updated_tran_texts
    }

    /// Set inserted rows
    pub fn with_inserted_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.inserted_rows = sorted_unique(rows);
        self
    }

    /// Set removed rows
    pub fn with_removed_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.removed_rows = sorted_unique(rows);
        self
    }

    /// Set generically updated rows
    pub fn with_updated_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.updated_rows = sorted_unique(rows);
        self
    }

    /// Set rows with updated positions
    pub fn with_updated_positions(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.updated_positions = sorted_unique(rows);
        self
    }

    /// Set rows with updated main texts
    pub fn with_updated_main_texts(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.updated_main_texts = sorted_unique(rows);
        self
    }

    /// Set rows with updated translation texts
    pub fn with_updated_tran_texts(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.updated_tran_texts = sorted_unique(rows);
        self
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.inserted_rows.is_empty()
            && self.removed_rows.is_empty()
            && self.updated().iter().all(|rows| rows.is_empty())
    }

    /// The four updated-row categories
    pub fn updated(&self) -> [&[usize]; 4] {
        [
            &self.updated_rows,
            &self.updated_positions,
            &self.updated_main_texts,
            &self.updated_tran_texts,
        ]
    }

    pub(crate) fn updated_mut(&mut self) -> [&mut Vec<usize>; 4] {
        [
            &mut self.updated_rows,
            &mut self.updated_positions,
            &mut self.updated_main_texts,
            &mut self.updated_tran_texts,
        ]
    }

    pub(crate) fn inserted_mut(&mut self) -> &mut Vec<usize> {
        &mut self.inserted_rows
    }

    pub(crate) fn removed_mut(&mut self) -> &mut Vec<usize> {
        &mut self.removed_rows
    }

    /// Re-establish the sorted, duplicate-free form of every list
    pub(crate) fn normalize(&mut self) {
        for rows in [&mut self.inserted_rows, &mut self.removed_rows] {
            rows.sort_unstable();
            rows.dedup();
        }
        for rows in self.updated_mut() {
            rows.sort_unstable();
            rows.dedup();
        }
    }

    /// Check that inserted and removed rows do not overlap
    pub fn validate(&self) -> Result<()> {
        let overlap = self
            .inserted_rows
            .iter()
            .find(|row| self.removed_rows.binary_search(row).is_ok());
        match overlap {
            Some(row) => Err(HistoryError::validation_error(format!(
                "row {} is both inserted and removed",
                row
            ))),
            None => Ok(()),
        }
    }
}

/// Clonable snapshot of an action, used as notification payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSummary {
    /// Identifier of the summarised action
    pub id: String,
    /// Register the action was recorded under
    pub register: Register,
    /// Documents the action touched
    pub docs: BTreeSet<Document>,
    /// Human-readable label
    pub description: String,
    /// Row deltas
    pub changes: RowChanges,
    /// When the action was recorded
    pub created_at: DateTime<Utc>,
}

/// Record of one completed mutation and the means to revert it
///
/// Row-delta builders start from fresh empty lists for every action; nothing
/// is shared between actions.
pub struct RevertableAction<T: Revertable> {
    id: String,
    created_at: DateTime<Utc>,
    register: Register,
    docs: BTreeSet<Document>,
    description: String,
    changes: RowChanges,
    emit_signal: bool,
    revert: Option<RevertFn<T>>,
}

impl<T: Revertable> RevertableAction<T> {
    /// Create an action touching `docs` that is reverted by `revert`
    pub fn new<F>(
        docs: impl IntoIterator<Item = Document>,
        description: impl Into<String>,
        revert: F,
    ) -> Self
    where
        F: FnOnce(&mut T, Register) -> std::result::Result<(), T::Error> + 'static,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            register: Register::Do,
            docs: docs.into_iter().collect(),
            description: description.into(),
            changes: RowChanges::new(),
            emit_signal: true,
            revert: Some(Box::new(revert)),
        }
    }

    /// Synthetic action that only carries row deltas for a notification
    pub(crate) fn notification(register: Register, changes: RowChanges) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            register,
            docs: [Document::Main, Document::Translation].into_iter().collect(),
            description: String::new(),
            changes,
            emit_signal: true,
            revert: None,
        }
    }

    /// Replace all row deltas at once
    pub fn with_changes(mut self, mut changes: RowChanges) -> Self {
        changes.normalize();
        self.changes = changes;
        self
    }

    /// Set inserted rows
    pub fn with_inserted_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.inserted_rows = sorted_unique(rows);
        self
    }

    /// Set removed rows
    pub fn with_removed_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.removed_rows = sorted_unique(rows);
        self
    }

    /// Set generically updated rows
    pub fn with_updated_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.updated_rows = sorted_unique(rows);
        self
    }

    /// Set rows with updated positions
    pub fn with_updated_positions(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.updated_positions = sorted_unique(rows);
        self
    }

    /// Set rows with updated main texts
    pub fn with_updated_main_texts(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.updated_main_texts = sorted_unique(rows);
        self
    }

    /// Set rows with updated translation texts
    pub fn with_updated_tran_texts(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.changes.updated_tran_texts = sorted_unique(rows);
        self
    }

    /// Whether registering this action alone emits a notification
    pub fn with_emit_signal(mut self, emit_signal: bool) -> Self {
        self.emit_signal = emit_signal;
        self
    }

    /// Unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the action was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Register the action was recorded under
    pub fn register(&self) -> Register {
        self.register
    }

    /// Documents the action touched
    pub fn docs(&self) -> &BTreeSet<Document> {
        &self.docs
    }

    /// Human-readable label
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Row deltas
    pub fn changes(&self) -> &RowChanges {
        &self.changes
    }

    /// Whether registering this action emits a notification
    pub fn emit_signal(&self) -> bool {
        self.emit_signal
    }

    /// Whether the revert procedure is still available
    pub fn is_revertable(&self) -> bool {
        self.revert.is_some()
    }

    /// Snapshot for observers
    pub fn summary(&self) -> ActionSummary {
        ActionSummary {
            id: self.id.clone(),
            register: self.register,
            docs: self.docs.clone(),
            description: self.description.clone(),
            changes: self.changes.clone(),
            created_at: self.created_at,
        }
    }

    pub(crate) fn set_register(&mut self, register: Register) {
        self.register = register;
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn normalize(&mut self) {
        self.changes.normalize();
    }

    /// Run the revert procedure once
    ///
    /// The procedure is consumed; the row deltas stay readable afterwards.
    pub(crate) fn revert(&mut self, target: &mut T) -> std::result::Result<(), T::Error> {
        let register = self.register.inverse();
        match self.revert.take() {
            Some(revert) => revert(target, register),
            None => Ok(()),
        }
    }
}

impl<T: Revertable> fmt::Debug for RevertableAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevertableAction")
            .field("id", &self.id)
            .field("register", &self.register)
            .field("docs", &self.docs)
            .field("description", &self.description)
            .field("changes", &self.changes)
            .field("emit_signal", &self.emit_signal)
            .field("revertable", &self.revert.is_some())
            .finish()
    }
}

/// Actions undone and redone as one unit
///
/// Members are ordered most recent first. Groups never nest.
pub struct RevertableActionGroup<T: Revertable> {
    actions: Vec<RevertableAction<T>>,
    description: String,
}

impl<T: Revertable> RevertableActionGroup<T> {
    /// Create a group from actions ordered most recent first
    pub fn new(actions: Vec<RevertableAction<T>>, description: impl Into<String>) -> Self {
        Self {
            actions,
            description: description.into(),
        }
    }

    /// Member actions, most recent first
    pub fn actions(&self) -> &[RevertableAction<T>] {
        &self.actions
    }

    /// Label of the whole group
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Break the group into its members
    pub fn into_actions(self) -> Vec<RevertableAction<T>> {
        self.actions
    }
}

/// One logical entry of a history stack
pub enum HistoryEntry<T: Revertable> {
    /// A single action
    Action(RevertableAction<T>),
    /// A group of actions
    Group(RevertableActionGroup<T>),
}

impl<T: Revertable> HistoryEntry<T> {
    /// Label shown in undo/redo menus
    pub fn description(&self) -> &str {
        match self {
            HistoryEntry::Action(action) => action.description(),
            HistoryEntry::Group(group) => group.description(),
        }
    }

    /// Whether the entry is a group
    pub fn is_group(&self) -> bool {
        matches!(self, HistoryEntry::Group(_))
    }

    /// Number of member actions
    pub fn action_count(&self) -> usize {
        match self {
            HistoryEntry::Action(_) => 1,
            HistoryEntry::Group(group) => group.actions.len(),
        }
    }

    /// Flatten into member actions, most recent first
    pub fn into_actions(self) -> Vec<RevertableAction<T>> {
        match self {
            HistoryEntry::Action(action) => vec![action],
            HistoryEntry::Group(group) => group.into_actions(),
        }
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        match self {
            HistoryEntry::Action(action) => action.set_description(description),
            HistoryEntry::Group(group) => group.description = description.into(),
        }
    }
}

impl<T: Revertable> fmt::Debug for RevertableActionGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevertableActionGroup")
            .field("description", &self.description)
            .field("actions", &self.actions)
            .finish()
    }
}

impl<T: Revertable> fmt::Debug for HistoryEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryEntry::Action(action) => action.fmt(f),
            HistoryEntry::Group(group) => group.fmt(f),
        }
    }
}
