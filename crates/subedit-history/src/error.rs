//! Error types for the history engine

use thiserror::Error;

use crate::register::Register;

/// Result alias used throughout the history engine
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors that can occur while recording or reverting actions
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Register is not legal for the requested operation
    #[error("Invalid register for this operation: {0}")]
    InvalidRegister(Register),

    /// Undo requested with nothing left to undo
    #[error("No more undos available")]
    NoMoreUndos,

    /// Redo requested with nothing left to redo
    #[error("No more redos available")]
    NoMoreRedos,

    /// Grouping asked for more entries than the stack holds
    #[error("Cannot group {requested} entries, only {available} available")]
    InsufficientEntries {
        /// Number of entries asked for
        requested: usize,
        /// Number of entries on the stack
        available: usize,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration could not be written
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HistoryError {
    /// Create a new Validation error with context
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Error for an empty source stack of the given register
    pub(crate) fn exhausted(register: Register) -> Self {
        match register.single() {
            Register::Redo => Self::NoMoreRedos,
            _ => Self::NoMoreUndos,
        }
    }
}
