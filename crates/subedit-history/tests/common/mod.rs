//! Line-based document shared by the integration tests

#![allow(dead_code)]

use subedit_history::{
    Document, HistoryConfig, HistoryError, HistoryManager, Register, Revertable,
    RevertableAction,
};

/// Lines of text that record every edit
pub struct Lines {
    pub lines: Vec<String>,
    pub history: HistoryManager<Lines>,
    pub emit_signal: bool,
}

impl Revertable for Lines {
    type Error = HistoryError;

    fn history(&self) -> &HistoryManager<Self> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut HistoryManager<Self> {
        &mut self.history
    }
}

/// One edit applied by the property tests
#[derive(Debug, Clone)]
pub enum Edit {
    Set(usize, String),
    Insert(usize, String),
    Remove(usize),
}

impl Lines {
    pub fn new(lines: &[&str]) -> Self {
        Self::with_config(lines, &HistoryConfig::default())
    }

    pub fn with_config(lines: &[&str], config: &HistoryConfig) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            history: HistoryManager::with_config(config),
            emit_signal: true,
        }
    }

    pub fn set(
        &mut self,
        row: usize,
        text: &str,
        register: Option<Register>,
    ) -> Result<(), HistoryError> {
        let old = std::mem::replace(&mut self.lines[row], text.to_string());
        let action = RevertableAction::new(
            [Document::Main],
            "Editing line",
            move |lines: &mut Lines, register| lines.set(row, &old, Some(register)),
        )
        .with_updated_main_texts([row])
        .with_emit_signal(self.emit_signal);
        self.history.register(register, action)
    }

    pub fn insert(
        &mut self,
        row: usize,
        text: &str,
        register: Option<Register>,
    ) -> Result<(), HistoryError> {
        self.lines.insert(row, text.to_string());
        let action = RevertableAction::new(
            [Document::Main],
            "Inserting line",
            move |lines: &mut Lines, register| lines.remove(row, Some(register)),
        )
        .with_inserted_rows([row])
        .with_emit_signal(self.emit_signal);
        self.history.register(register, action)
    }

    pub fn remove(
        &mut self,
        row: usize,
        register: Option<Register>,
    ) -> Result<(), HistoryError> {
        let text = self.lines.remove(row);
        let action = RevertableAction::new(
            [Document::Main],
            "Removing line",
            move |lines: &mut Lines, register| lines.insert(row, &text, Some(register)),
        )
        .with_removed_rows([row])
        .with_emit_signal(self.emit_signal);
        self.history.register(register, action)
    }

    /// Apply an edit, clamping its row into the current document
    ///
    /// Removals from an empty document are skipped; returns whether anything
    /// was applied.
    pub fn apply(&mut self, edit: &Edit) -> Result<bool, HistoryError> {
        let len = self.lines.len();
        match edit {
            Edit::Set(row, text) if len > 0 => self.set(row % len, text, Some(Register::Do))?,
            Edit::Insert(row, text) => self.insert(row % (len + 1), text, Some(Register::Do))?,
            Edit::Remove(row) if len > 0 => self.remove(row % len, Some(Register::Do))?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
