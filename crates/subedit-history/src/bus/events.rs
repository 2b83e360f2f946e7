//! Event types published by the history manager

use serde::Serialize;

use crate::action::ActionSummary;
use crate::register::Signal;

/// Notification that the history changed the document
///
/// For batches the payload is the aggregate of the whole batch, with row
/// indices valid after the batch was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", content = "action", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// A fresh edit was registered
    ActionDone(ActionSummary),
    /// One action or one batch was undone
    ActionUndone(ActionSummary),
    /// One action or one batch was redone
    ActionRedone(ActionSummary),
}

impl HistoryEvent {
    /// Build the event for a signal
    pub fn new(signal: Signal, action: ActionSummary) -> Self {
        match signal {
            Signal::ActionDone => HistoryEvent::ActionDone(action),
            Signal::ActionUndone => HistoryEvent::ActionUndone(action),
            Signal::ActionRedone => HistoryEvent::ActionRedone(action),
        }
    }

    /// Signal name of this event
    pub fn signal(&self) -> Signal {
        match self {
            HistoryEvent::ActionDone(_) => Signal::ActionDone,
            HistoryEvent::ActionUndone(_) => Signal::ActionUndone,
            HistoryEvent::ActionRedone(_) => Signal::ActionRedone,
        }
    }

    /// Payload
    pub fn action(&self) -> &ActionSummary {
        match self {
            HistoryEvent::ActionDone(action)
            | HistoryEvent::ActionUndone(action)
            | HistoryEvent::ActionRedone(action) => action,
        }
    }
}
