//! Error types for project editing

use subedit_history::HistoryError;
use thiserror::Error;

/// Result alias for project operations
pub type Result<T> = std::result::Result<T, ProjectError>;

/// Errors raised by editing operations, always before anything is mutated
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Row does not exist
    #[error("Row {row} out of range for {len} subtitles")]
    RowOutOfRange {
        /// Requested row
        row: usize,
        /// Number of subtitles at the time of the check
        len: usize,
    },

    /// Rows and values of different lengths
    #[error("Expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Number of rows
        expected: usize,
        /// Number of values
        actual: usize,
    },

    /// The same row given twice
    #[error("Row {0} given more than once")]
    DuplicateRow(usize),

    /// Rows that cannot be merged
    #[error("Cannot merge rows {0:?}, need at least two consecutive rows")]
    InvalidMerge(Vec<usize>),

    /// Position arithmetic out of the representable range
    #[error("Position of row {row} out of range")]
    PositionOverflow {
        /// Row whose position would overflow
        row: usize,
    },

    /// Undo limit too small to record a compound edit as one group
    #[error("Undo limit {limit} cannot hold {required} grouped actions")]
    UndoLimitTooSmall {
        /// Actions the edit groups
        required: usize,
        /// Configured undo limit
        limit: usize,
    },

    /// Recording or reverting failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}
