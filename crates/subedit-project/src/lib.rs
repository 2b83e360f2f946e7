#![warn(missing_docs)]

//! Subtitle project with revertable editing operations
//!
//! [`Project`] holds the subtitles of an open file and records every edit in
//! its [`HistoryManager`](subedit_history::HistoryManager), so that edits can
//! be undone and redone and observers are told which rows changed.

pub mod error;
pub mod project;
pub mod subtitle;

// Re-export public API
pub use error::{ProjectError, Result};
pub use project::{Project, BLANK_DURATION};
pub use subtitle::Subtitle;
pub use subedit_history::{Document, HistoryEvent, Register, Revertable};
