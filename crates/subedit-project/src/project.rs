//! Subtitle project and its revertable editing operations
//!
//! Every editing operation takes the register to record it under, mutates
//! the subtitles and finally registers an action whose revert procedure
//! calls the inverse operation. Passing `None` edits without history.

use subedit_history::{
    Document, HistoryConfig, HistoryManager, Register, Revertable, RevertableAction,
};
use tracing::debug;

use crate::error::{ProjectError, Result};
use crate::subtitle::Subtitle;

/// Length of subtitles created by [`Project::insert_blank_subtitles`]
pub const BLANK_DURATION: i64 = 3000;

/// Actions recorded by a merge before they are grouped
const MERGE_ACTIONS: usize = 4;

/// Subtitles of an open file, with main and translation texts
pub struct Project {
    subtitles: Vec<Subtitle>,
    history: HistoryManager<Project>,
}

impl Revertable for Project {
    type Error = ProjectError;

    fn history(&self) -> &HistoryManager<Self> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut HistoryManager<Self> {
        &mut self.history
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("subtitles", &self.subtitles)
            .field("history", &self.history)
            .finish()
    }
}

fn action(
    docs: impl IntoIterator<Item = Document>,
    description: &str,
    revert: impl FnOnce(&mut Project, Register) -> Result<()> + 'static,
) -> RevertableAction<Project> {
    RevertableAction::new(docs, description, revert)
}

fn with_updated_texts(
    action: RevertableAction<Project>,
    doc: Document,
    rows: impl IntoIterator<Item = usize>,
) -> RevertableAction<Project> {
    match doc {
        Document::Main => action.with_updated_main_texts(rows),
        Document::Translation => action.with_updated_tran_texts(rows),
    }
}

impl Project {
    /// Empty project with default history configuration
    pub fn new() -> Self {
        Self::with_config(&HistoryConfig::default())
    }

    /// Empty project with the given history configuration
    pub fn with_config(config: &HistoryConfig) -> Self {
        Self {
            subtitles: Vec::new(),
            history: HistoryManager::with_config(config),
        }
    }

    /// Replace the subtitles, e.g. after reading a file
    ///
    /// History of the previous document is dropped.
    pub fn open(&mut self, subtitles: Vec<Subtitle>) {
        debug!(count = subtitles.len(), "Opening subtitles");
        self.subtitles = subtitles;
        self.history.clear();
    }

    /// All subtitles in display order
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// Subtitle at `row`
    pub fn subtitle(&self, row: usize) -> Option<&Subtitle> {
        self.subtitles.get(row)
    }

    /// Number of subtitles
    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    /// Whether there are no subtitles
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.subtitles.len() {
            return Err(ProjectError::RowOutOfRange {
                row,
                len: self.subtitles.len(),
            });
        }
        Ok(())
    }

    /// Existing, distinct rows in ascending order
    fn check_rows(&self, rows: &[usize]) -> Result<Vec<usize>> {
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProjectError::DuplicateRow(pair[0]));
        }
        for &row in &sorted {
            self.check_row(row)?;
        }
        Ok(sorted)
    }

    /// Distinct ascending rows, each valid once the rows before it exist
    fn check_insertion_rows(&self, sorted: &[usize]) -> Result<()> {
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProjectError::DuplicateRow(pair[0]));
        }
        for (inserted, &row) in sorted.iter().enumerate() {
            let len = self.subtitles.len() + inserted;
            if row > len {
                return Err(ProjectError::RowOutOfRange { row, len });
            }
        }
        Ok(())
    }

    /// Set the text of one document
    pub fn set_text(
        &mut self,
        row: usize,
        doc: Document,
        text: impl Into<String>,
        register: Option<Register>,
    ) -> Result<()> {
        self.check_row(row)?;
        let old = std::mem::replace(self.subtitles[row].text_mut(doc), text.into());
        let action = action([doc], "Editing text", move |project, register| {
            project.set_text(row, doc, old, Some(register))
        });
        self.history
            .register(register, with_updated_texts(action, doc, [row]))?;
        Ok(())
    }

    /// Set the start position and keep subtitles ordered by start
    pub fn set_start(&mut self, row: usize, start: i64, register: Option<Register>) -> Result<()> {
        self.check_row(row)?;
        self.reposition(row, start, None, register)
    }

    /// Set the start of `row` and move it to `target`, or to where it sorts
    fn reposition(
        &mut self,
        row: usize,
        start: i64,
        target: Option<usize>,
        register: Option<Register>,
    ) -> Result<()> {
        let mut subtitle = self.subtitles.remove(row);
        let old_start = std::mem::replace(&mut subtitle.start, start);
        let new_row = match target {
            Some(target) => target.min(self.subtitles.len()),
            None => sorted_position(&self.subtitles, row, start),
        };
        self.subtitles.insert(new_row, subtitle);

        let (low, high) = (row.min(new_row), row.max(new_row));
        let mut action = action(
            [Document::Main],
            "Editing start position",
            move |project, register| {
                project.reposition(new_row, old_start, Some(row), Some(register))
            },
        )
        .with_updated_positions(low..=high);
        if low != high {
            action = action.with_updated_rows(low..=high);
        }
        self.history.register(register, action)?;
        Ok(())
    }

    /// Set the end position
    pub fn set_end(&mut self, row: usize, end: i64, register: Option<Register>) -> Result<()> {
        self.check_row(row)?;
        let old = std::mem::replace(&mut self.subtitles[row].end, end);
        let action = action(
            [Document::Main],
            "Editing end position",
            move |project, register| project.set_end(row, old, Some(register)),
        )
        .with_updated_positions([row]);
        self.history.register(register, action)?;
        Ok(())
    }

    /// Set the end position relative to the start
    pub fn set_duration(
        &mut self,
        row: usize,
        duration: i64,
        register: Option<Register>,
    ) -> Result<()> {
        self.check_row(row)?;
        let subtitle = &mut self.subtitles[row];
        let end = subtitle
            .start
            .checked_add(duration)
            .ok_or(ProjectError::PositionOverflow { row })?;
        let old = subtitle.duration();
        subtitle.end = end;
        let action = action(
            [Document::Main],
            "Editing duration",
            move |project, register| project.set_duration(row, old, Some(register)),
        )
        .with_updated_positions([row]);
        self.history.register(register, action)?;
        Ok(())
    }

    /// Move start and end of `rows` by `delta` milliseconds
    ///
    /// Order of subtitles is left as is.
    pub fn shift_positions(
        &mut self,
        rows: &[usize],
        delta: i64,
        register: Option<Register>,
    ) -> Result<()> {
        let rows = self.check_rows(rows)?;
        let shifted = rows
            .iter()
            .map(|&row| {
                let subtitle = &self.subtitles[row];
                subtitle
                    .start
                    .checked_add(delta)
                    .zip(subtitle.end.checked_add(delta))
                    .filter(|_| delta.checked_neg().is_some())
                    .ok_or(ProjectError::PositionOverflow { row })
            })
            .collect::<Result<Vec<_>>>()?;
        for (&row, (start, end)) in rows.iter().zip(shifted) {
            let subtitle = &mut self.subtitles[row];
            subtitle.start = start;
            subtitle.end = end;
        }
        let updated = rows.clone();
        let action = action(
            [Document::Main],
            "Shifting positions",
            move |project, register| project.shift_positions(&rows, -delta, Some(register)),
        )
        .with_updated_positions(updated);
        self.history.register(register, action)?;
        Ok(())
    }

    /// Replace texts of `rows` in one document, pairwise with `texts`
    pub fn replace_texts(
        &mut self,
        rows: &[usize],
        doc: Document,
        texts: Vec<String>,
        register: Option<Register>,
    ) -> Result<()> {
        self.replace(rows, doc, texts, "Replacing texts", register)
    }

    /// Empty the texts of `rows` in one document
    pub fn clear_texts(
        &mut self,
        rows: &[usize],
        doc: Document,
        register: Option<Register>,
    ) -> Result<()> {
        let texts = vec![String::new(); rows.len()];
        self.replace(rows, doc, texts, "Clearing texts", register)
    }

    fn replace(
        &mut self,
        rows: &[usize],
        doc: Document,
        texts: Vec<String>,
        description: &str,
        register: Option<Register>,
    ) -> Result<()> {
        if rows.len() != texts.len() {
            return Err(ProjectError::LengthMismatch {
                expected: rows.len(),
                actual: texts.len(),
            });
        }
        self.check_rows(rows)?;

        let rows = rows.to_vec();
        let old: Vec<String> = rows
            .iter()
            .zip(texts)
            .map(|(&row, text)| std::mem::replace(self.subtitles[row].text_mut(doc), text))
            .collect();
        let updated = rows.clone();
        let action = action([doc], description, move |project, register| {
            project.replace_texts(&rows, doc, old, Some(register))
        });
        self.history
            .register(register, with_updated_texts(action, doc, updated))?;
        Ok(())
    }

    /// Insert `subtitles` so that they end up at `rows`
    ///
    /// Rows refer to positions after the insertion.
    pub fn insert_subtitles(
        &mut self,
        rows: &[usize],
        subtitles: Vec<Subtitle>,
        register: Option<Register>,
    ) -> Result<()> {
        if rows.len() != subtitles.len() {
            return Err(ProjectError::LengthMismatch {
                expected: rows.len(),
                actual: subtitles.len(),
            });
        }
        let mut pairs: Vec<(usize, Subtitle)> = rows.iter().copied().zip(subtitles).collect();
        pairs.sort_by_key(|(row, _)| *row);
        let rows: Vec<usize> = pairs.iter().map(|(row, _)| *row).collect();
        self.check_insertion_rows(&rows)?;

        for (row, subtitle) in pairs {
            self.subtitles.insert(row, subtitle);
        }
        self.register_insertion(rows, "Inserting subtitles", register)
    }

    /// Insert empty subtitles at `rows`, each placed after its predecessor
    pub fn insert_blank_subtitles(
        &mut self,
        rows: &[usize],
        register: Option<Register>,
    ) -> Result<()> {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        self.check_insertion_rows(&rows)?;

        for &row in &rows {
            let start = row
                .checked_sub(1)
                .and_then(|previous| self.subtitles.get(previous))
                .map_or(0, |previous| previous.end);
            self.subtitles
                .insert(row, Subtitle::new(start, start + BLANK_DURATION, ""));
        }
        self.register_insertion(rows, "Inserting blank subtitles", register)
    }

    fn register_insertion(
        &mut self,
        rows: Vec<usize>,
        description: &str,
        register: Option<Register>,
    ) -> Result<()> {
        let inserted = rows.clone();
        let action = action(
            [Document::Main, Document::Translation],
            description,
            move |project, register| project.remove_subtitles(&rows, Some(register)),
        )
        .with_inserted_rows(inserted);
        self.history.register(register, action)?;
        Ok(())
    }

    /// Remove the subtitles at `rows`
    pub fn remove_subtitles(&mut self, rows: &[usize], register: Option<Register>) -> Result<()> {
        let rows = self.check_rows(rows)?;
        let mut removed: Vec<Subtitle> = rows
            .iter()
            .rev()
            .map(|&row| self.subtitles.remove(row))
            .collect();
        removed.reverse();

        let removed_rows = rows.clone();
        let action = action(
            [Document::Main, Document::Translation],
            "Removing subtitles",
            move |project, register| project.insert_subtitles(&rows, removed, Some(register)),
        )
        .with_removed_rows(removed_rows);
        self.history.register(register, action)?;
        Ok(())
    }

    /// Merge consecutive `rows` into the first one
    ///
    /// Texts are joined by newlines and the merged subtitle ends where the
    /// last one did. Recorded as one group.
    pub fn merge_subtitles(&mut self, rows: &[usize], register: Option<Register>) -> Result<()> {
        let rows = self.check_rows(rows)?;
        let consecutive = rows.windows(2).all(|pair| pair[1] == pair[0] + 1);
        if rows.len() < 2 || !consecutive {
            return Err(ProjectError::InvalidMerge(rows));
        }
        if let Some(limit) = register.and(self.history.undo_limit()) {
            if limit < MERGE_ACTIONS {
                return Err(ProjectError::UndoLimitTooSmall {
                    required: MERGE_ACTIONS,
                    limit,
                });
            }
        }
        let (first, last) = (rows[0], rows[rows.len() - 1]);

        let merged = &self.subtitles[first..=last];
        let end = self.subtitles[last].end;
        let main = join_texts(merged, Document::Main);
        let tran = join_texts(merged, Document::Translation);
        debug!(first, last, "Merging subtitles");

        {
            let _block = self.history.block_signals();
            self.set_end(first, end, register)?;
            self.replace_texts(&[first], Document::Main, vec![main], register)?;
            self.replace_texts(&[first], Document::Translation, vec![tran], register)?;
            self.remove_subtitles(&rows[1..], register)?;
        }
        if let Some(register) = register {
            self.history
                .group(register, MERGE_ACTIONS, "Merging subtitles", true)?;
        }
        Ok(())
    }
}

/// Row where a subtitle removed from `row` goes once its start is `start`
///
/// Stays put while it still sorts there, otherwise goes after all subtitles
/// starting at or before it.
fn sorted_position(others: &[Subtitle], row: usize, start: i64) -> usize {
    let fits_before = row == 0 || others[row - 1].start <= start;
    let fits_after = row >= others.len() || others[row].start >= start;
    if fits_before && fits_after {
        row
    } else {
        others.partition_point(|subtitle| subtitle.start <= start)
    }
}

fn join_texts(subtitles: &[Subtitle], doc: Document) -> String {
    subtitles
        .iter()
        .map(|subtitle| subtitle.text(doc))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
