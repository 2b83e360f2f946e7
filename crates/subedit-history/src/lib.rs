#![warn(missing_docs)]

//! Revertable action history for subtitle documents
//!
//! Records every edit of a subtitle project as a [`RevertableAction`] that
//! knows how to revert itself, keeps undo and redo stacks with optional
//! grouping, and notifies observers with row deltas they can use to refresh
//! only what changed.
//!
//! # Example
//!
//! ```rust
//! use subedit_history::{
//!     Document, HistoryError, HistoryManager, Register, Revertable, RevertableAction,
//! };
//!
//! struct Note {
//!     text: String,
//!     history: HistoryManager<Note>,
//! }
//!
//! impl Revertable for Note {
//!     type Error = HistoryError;
//!
//!     fn history(&self) -> &HistoryManager<Self> {
//!         &self.history
//!     }
//!
//!     fn history_mut(&mut self) -> &mut HistoryManager<Self> {
//!         &mut self.history
//!     }
//! }
//!
//! impl Note {
//!     fn set_text(&mut self, text: &str, register: Option<Register>) -> Result<(), HistoryError> {
//!         let old = std::mem::replace(&mut self.text, text.to_string());
//!         let action = RevertableAction::new(
//!             [Document::Main],
//!             "Editing text",
//!             move |note: &mut Note, register| note.set_text(&old, Some(register)),
//!         )
//!         .with_updated_main_texts([0]);
//!         self.history.register(register, action)
//!     }
//! }
//!
//! let mut note = Note { text: "hello".into(), history: HistoryManager::new() };
//! note.set_text("world", Some(Register::Do)).unwrap();
//! note.undo(1).unwrap();
//! assert_eq!(note.text, "hello");
//! note.redo(1).unwrap();
//! assert_eq!(note.text, "world");
//! ```

pub mod action;
pub mod aggregate;
pub mod bus;
pub mod config;
pub mod error;
pub mod manager;
pub mod register;
pub mod stacks;

#[cfg(test)]
mod testing;

// Re-export public API
pub use action::{
    sorted_unique, ActionSummary, HistoryEntry, RevertFn, RevertableAction,
    RevertableActionGroup, RowChanges,
};
pub use aggregate::{aggregate, notification_action};
pub use bus::{EventBus, HistoryEvent};
pub use config::{ConfigLoader, HistoryConfig};
pub use error::{HistoryError, Result};
pub use manager::{HistoryManager, Revertable, SignalBlock};
pub use register::{Document, Register, Signal};
pub use stacks::{ChangeCounters, HistoryStacks, StackKind};
