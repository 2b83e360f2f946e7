//! Minimal revertable document used by unit tests

use crate::action::RevertableAction;
use crate::error::{HistoryError, Result};
use crate::manager::{HistoryManager, Revertable};
use crate::register::{Document, Register};

/// Rows of plain text with a history
pub(crate) struct Sheet {
    pub(crate) rows: Vec<String>,
    pub(crate) history: HistoryManager<Sheet>,
    /// Register new actions without notifications
    pub(crate) quiet: bool,
    /// Document edits are attributed to
    pub(crate) doc: Document,
}

impl Revertable for Sheet {
    type Error = HistoryError;

    fn history(&self) -> &HistoryManager<Self> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut HistoryManager<Self> {
        &mut self.history
    }
}

impl Sheet {
    pub(crate) fn new(rows: &[&str]) -> Self {
        Self {
            rows: rows.iter().map(|row| row.to_string()).collect(),
            history: HistoryManager::new(),
            quiet: false,
            doc: Document::Main,
        }
    }

    fn action(
        &self,
        description: &str,
        revert: impl FnOnce(&mut Sheet, Register) -> Result<()> + 'static,
    ) -> RevertableAction<Sheet> {
        RevertableAction::new([self.doc], description, revert).with_emit_signal(!self.quiet)
    }

    pub(crate) fn set(&mut self, row: usize, text: &str, register: Option<Register>) -> Result<()> {
        let old = std::mem::replace(&mut self.rows[row], text.to_string());
        let action = self
            .action("Editing row", move |sheet, register| {
                sheet.set(row, &old, Some(register))
            })
            .with_updated_main_texts([row]);
        self.history.register(register, action)
    }

    pub(crate) fn insert(
        &mut self,
        row: usize,
        text: &str,
        register: Option<Register>,
    ) -> Result<()> {
        self.rows.insert(row, text.to_string());
        let action = self
            .action("Inserting row", move |sheet, register| {
                sheet.remove(row, Some(register))
            })
            .with_inserted_rows([row]);
        self.history.register(register, action)
    }

    pub(crate) fn remove(&mut self, row: usize, register: Option<Register>) -> Result<()> {
        let text = self.rows.remove(row);
        let action = self
            .action("Removing row", move |sheet, register| {
                sheet.insert(row, &text, Some(register))
            })
            .with_removed_rows([row]);
        self.history.register(register, action)
    }

    /// Register an action whose revert always fails
    pub(crate) fn broken(&mut self, register: Option<Register>) -> Result<()> {
        let action = self.action("Broken", |_, _| {
            Err(HistoryError::validation_error("revert failed"))
        });
        self.history.register(register, action)
    }
}
