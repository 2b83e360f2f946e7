//! Registers, documents and notification signals

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mode under which an action is recorded
///
/// The `*Multiple` variants only exist at the batching layer: they select
/// stacks and signals for grouping and batched reverts, and are rejected when
/// registering a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Register {
    /// A fresh edit
    Do,
    /// Reverting a prior `Do` or `Redo`
    Undo,
    /// Reverting a prior `Undo`
    Redo,
    /// Batch of fresh edits
    DoMultiple,
    /// Batch undo
    UndoMultiple,
    /// Batch redo
    RedoMultiple,
}

impl Register {
    /// Strip the batch marker
    pub fn single(self) -> Register {
        match self {
            Register::Do | Register::DoMultiple => Register::Do,
            Register::Undo | Register::UndoMultiple => Register::Undo,
            Register::Redo | Register::RedoMultiple => Register::Redo,
        }
    }

    /// Register under which reverting an action of this register is recorded
    pub fn inverse(self) -> Register {
        match self.single() {
            Register::Undo => Register::Redo,
            _ => Register::Undo,
        }
    }

    /// Whether actions are being reverted rather than replayed forward
    pub fn is_revert(self) -> bool {
        self.single() != Register::Do
    }

    /// Whether this is a batch register
    pub fn is_multiple(self) -> bool {
        matches!(
            self,
            Register::DoMultiple | Register::UndoMultiple | Register::RedoMultiple
        )
    }

    /// Signal emitted for actions recorded under this register
    pub fn signal(self) -> Signal {
        match self.single() {
            Register::Undo => Signal::ActionUndone,
            Register::Redo => Signal::ActionRedone,
            _ => Signal::ActionDone,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Do => "do",
            Register::Undo => "undo",
            Register::Redo => "redo",
            Register::DoMultiple => "do-multiple",
            Register::UndoMultiple => "undo-multiple",
            Register::RedoMultiple => "redo-multiple",
        };
        f.write_str(name)
    }
}

/// Parallel documents of a subtitle project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Document {
    /// Main text and timing
    Main,
    /// Translation text
    Translation,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Main => write!(f, "main"),
            Document::Translation => write!(f, "translation"),
        }
    }
}

/// Named notifications sent to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// A fresh edit was registered
    ActionDone,
    /// An action was undone
    ActionUndone,
    /// An action was redone
    ActionRedone,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::ActionDone => write!(f, "action_done"),
            Signal::ActionUndone => write!(f, "action_undone"),
            Signal::ActionRedone => write!(f, "action_redone"),
        }
    }
}
