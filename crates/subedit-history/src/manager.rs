//! History management: registration, undo, redo and grouping
//!
//! Every mutating document operation ends by registering a
//! [`RevertableAction`] that knows how to revert it. Reverting runs that
//! procedure, which performs the inverse mutation and registers the inverse
//! action under the swapped register, so the history keeps bouncing actions
//! between the undo and redo stacks.

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::action::{ActionSummary, HistoryEntry, RevertableAction, RevertableActionGroup};
use crate::aggregate::notification_action;
use crate::bus::{EventBus, HistoryEvent};
use crate::config::HistoryConfig;
use crate::error::{HistoryError, Result};
use crate::register::{Document, Register, Signal};
use crate::stacks::{ChangeCounters, HistoryStacks, StackKind};

/// A document that owns its history
///
/// Revert procedures need mutable access to the document while the history
/// lives inside it, so undo and redo are driven through the document rather
/// than through the [`HistoryManager`] alone.
pub trait Revertable: Sized {
    /// Error returned by revert procedures
    type Error: From<HistoryError>;

    /// The document's history
    fn history(&self) -> &HistoryManager<Self>;

    /// The document's history, mutably
    fn history_mut(&mut self) -> &mut HistoryManager<Self>;

    /// Whether something can be undone
    fn can_undo(&self) -> bool {
        self.history().can_undo()
    }

    /// Whether something can be redone
    fn can_redo(&self) -> bool {
        self.history().can_redo()
    }

    /// Undo `count` entries, a group counting as one
    ///
    /// Emits one notification whatever the number of underlying actions.
    fn undo(&mut self, count: usize) -> std::result::Result<(), Self::Error> {
        revert(self, count, Register::Undo)
    }

    /// Redo `count` entries, a group counting as one
    fn redo(&mut self, count: usize) -> std::result::Result<(), Self::Error> {
        revert(self, count, Register::Redo)
    }
}

/// Suppresses notifications until dropped
///
/// Restores the previous state on drop, including when a revert procedure
/// fails or panics.
#[must_use = "notifications are re-enabled as soon as the guard is dropped"]
pub struct SignalBlock {
    flag: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for SignalBlock {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Undo/redo stacks, change counters and notification bookkeeping
pub struct HistoryManager<T: Revertable> {
    stacks: HistoryStacks<T>,
    counters: ChangeCounters,
    bus: EventBus,
    suppressed: Rc<Cell<bool>>,
    // Label of the action whose revert procedure is running.
    reverting: Option<String>,
}

impl<T: Revertable> HistoryManager<T> {
    /// Create a history with default configuration
    pub fn new() -> Self {
        Self::with_config(&HistoryConfig::default())
    }

    /// Create a history from configuration
    pub fn with_config(config: &HistoryConfig) -> Self {
        Self {
            stacks: HistoryStacks::new(config.undo_limit),
            counters: ChangeCounters::default(),
            bus: EventBus::with_capacity(config.event_capacity.max(1)),
            suppressed: Rc::new(Cell::new(false)),
            reverting: None,
        }
    }

    /// Create a history with an undo depth limit
    pub fn with_undo_limit(undo_limit: Option<usize>) -> Self {
        Self::with_config(&HistoryConfig {
            undo_limit,
            ..HistoryConfig::default()
        })
    }

    /// Register an action done, undone or redone
    ///
    /// `None` means the mutation is not tracked and nothing happens.
    pub fn register(
        &mut self,
        register: Option<Register>,
        mut action: RevertableAction<T>,
    ) -> Result<()> {
        let Some(register) = register else {
            return Ok(());
        };
        if register.is_multiple() {
            return Err(HistoryError::InvalidRegister(register));
        }
        action.normalize();
        action.changes().validate()?;
        action.set_register(register);

        match register {
            Register::Do => {
                self.stacks.clear(StackKind::Redoable);
                self.counters.shift(action.docs(), 1);
            }
            Register::Undo | Register::Redo => {
                let source = StackKind::source(register)?;
                let description = self.reverting.take().or_else(|| {
                    self.stacks
                        .front(source)
                        .map(|entry| entry.description().to_string())
                });
                if let Some(description) = description {
                    action.set_description(description);
                }
                let shift = if register == Register::Undo { -1 } else { 1 };
                self.counters.shift(action.docs(), shift);
            }
            _ => return Err(HistoryError::InvalidRegister(register)),
        }

        debug!(
            register = %register,
            description = action.description(),
            "Registered action"
        );
        let summary = action.emit_signal().then(|| action.summary());
        self.stacks
            .push(StackKind::destination(register), HistoryEntry::Action(action));
        if let Some(summary) = summary {
            self.emit(register.signal(), summary);
        }
        Ok(())
    }

    /// Group the `count` most recent entries registered under `register`
    ///
    /// Used after several registrations made with `emit_signal` off, so that
    /// they are undone as one step. When `emit_signal` is set, one aggregate
    /// notification is sent for the members in registration order.
    pub fn group(
        &mut self,
        register: Register,
        count: usize,
        description: impl Into<String>,
        emit_signal: bool,
    ) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let kind = StackKind::destination(register);
        let available = self.stacks.len(kind);
        if available < count {
            return Err(HistoryError::InsufficientEntries {
                requested: count,
                available,
            });
        }

        let mut actions = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(entry) = self.stacks.pop(kind) {
                actions.extend(entry.into_actions());
            }
        }
        let description = description.into();
        debug!(
            register = %register,
            count,
            description = description.as_str(),
            "Grouped actions"
        );

        let summary = emit_signal
            .then(|| notification_action(actions.iter().rev(), register).summary());
        self.stacks.push(
            kind,
            HistoryEntry::Group(RevertableActionGroup::new(actions, description)),
        );
        if let Some(summary) = summary {
            self.emit(register.signal(), summary);
        }
        Ok(())
    }

    /// Relabel the most recent entry registered under `register`
    pub fn set_action_description(
        &mut self,
        register: Option<Register>,
        description: impl Into<String>,
    ) {
        let Some(register) = register else {
            return;
        };
        let kind = StackKind::destination(register);
        if let Some(entry) = self.stacks.stack_mut(kind).front_mut() {
            entry.set_description(description);
        }
    }

    /// Whether something can be undone
    pub fn can_undo(&self) -> bool {
        !self.stacks.is_empty(StackKind::Undoable)
    }

    /// Whether something can be redone
    pub fn can_redo(&self) -> bool {
        !self.stacks.is_empty(StackKind::Redoable)
    }

    /// Number of undoable entries
    pub fn undo_len(&self) -> usize {
        self.stacks.len(StackKind::Undoable)
    }

    /// Number of redoable entries
    pub fn redo_len(&self) -> usize {
        self.stacks.len(StackKind::Redoable)
    }

    /// Undoable entries, most recent first
    pub fn undoables(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.stacks.stack(StackKind::Undoable).iter()
    }

    /// Redoable entries, most recent first
    pub fn redoables(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.stacks.stack(StackKind::Redoable).iter()
    }

    /// Labels of undoable entries, most recent first
    pub fn undo_descriptions(&self) -> Vec<String> {
        self.stacks.descriptions(StackKind::Undoable)
    }

    /// Labels of redoable entries, most recent first
    pub fn redo_descriptions(&self) -> Vec<String> {
        self.stacks.descriptions(StackKind::Redoable)
    }

    /// Maximum undo depth
    pub fn undo_limit(&self) -> Option<usize> {
        self.stacks.undo_limit()
    }

    /// Change the maximum undo depth, discarding the oldest entries
    pub fn set_undo_limit(&mut self, undo_limit: Option<usize>) {
        self.stacks.set_undo_limit(undo_limit);
    }

    /// Drop all history, e.g. when another file is opened
    pub fn clear(&mut self) {
        self.stacks.clear(StackKind::Undoable);
        self.stacks.clear(StackKind::Redoable);
        self.counters = ChangeCounters::default();
        self.reverting = None;
        debug!("Cleared history");
    }

    /// Per-document change counters
    pub fn counters(&self) -> ChangeCounters {
        self.counters
    }

    /// Whether a document has unsaved changes
    pub fn is_changed(&self, doc: Document) -> bool {
        self.counters.get(doc) != 0
    }

    /// Mark a document as saved
    pub fn mark_unchanged(&mut self, doc: Document) {
        self.counters.reset(doc);
    }

    /// Event bus notifications are published on
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to notifications
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HistoryEvent> {
        self.bus.subscribe()
    }

    /// Suppress notifications until the returned guard is dropped
    pub fn block_signals(&self) -> SignalBlock {
        let previous = self.suppressed.replace(true);
        SignalBlock {
            flag: Rc::clone(&self.suppressed),
            previous,
        }
    }

    /// Whether notifications are currently suppressed
    pub fn signals_blocked(&self) -> bool {
        self.suppressed.get()
    }

    fn emit(&self, signal: Signal, action: ActionSummary) {
        if self.suppressed.get() {
            trace!(signal = %signal, "Notification suppressed");
            return;
        }
        self.bus.publish(HistoryEvent::new(signal, action));
    }

    fn pop(&mut self, kind: StackKind) -> Option<HistoryEntry<T>> {
        self.stacks.pop(kind)
    }

    fn stack_mut(&mut self, kind: StackKind) -> &mut VecDeque<HistoryEntry<T>> {
        self.stacks.stack_mut(kind)
    }
}

impl<T: Revertable> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Revertable> fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undoables", &self.undo_descriptions())
            .field("redoables", &self.redo_descriptions())
            .field("undo_limit", &self.undo_limit())
            .field("counters", &self.counters)
            .finish()
    }
}

fn revert<T: Revertable>(
    target: &mut T,
    count: usize,
    register: Register,
) -> std::result::Result<(), T::Error> {
    if count == 0 {
        return Ok(());
    }
    let source = StackKind::source(register)?;
    let history = target.history();
    if history.stacks.len(source) < count {
        return Err(HistoryError::exhausted(register).into());
    }

    let single = count == 1
        && matches!(history.stacks.front(source), Some(HistoryEntry::Action(_)));
    if !single {
        let register = match register.single() {
            Register::Undo => Register::UndoMultiple,
            _ => Register::RedoMultiple,
        };
        return revert_multiple(target, count, register, source);
    }

    match target.history_mut().pop(source) {
        Some(HistoryEntry::Action(action)) => {
            debug!(
                register = %register,
                description = action.description(),
                "Reverting action"
            );
            revert_action(target, action).map(|_| ())
        }
        _ => Err(HistoryError::exhausted(register).into()),
    }
}

fn revert_multiple<T: Revertable>(
    target: &mut T,
    count: usize,
    register: Register,
    source: StackKind,
) -> std::result::Result<(), T::Error> {
    debug!(register = %register, count, "Reverting batch");
    let mut reverted = Vec::new();
    let result = {
        let _block = target.history().block_signals();
        revert_entries(target, count, register, source, &mut reverted)
    };

    // Observers still need to see what was reverted before a failure.
    if result.is_ok() || !reverted.is_empty() {
        let summary = notification_action(reverted.iter(), register).summary();
        target.history().emit(register.signal(), summary);
    }
    result
}

fn revert_entries<T: Revertable>(
    target: &mut T,
    count: usize,
    register: Register,
    source: StackKind,
    reverted: &mut Vec<RevertableAction<T>>,
) -> std::result::Result<(), T::Error> {
    for _ in 0..count {
        let entry = target
            .history_mut()
            .pop(source)
            .ok_or_else(|| HistoryError::exhausted(register))?;
        match entry {
            HistoryEntry::Action(action) => reverted.push(revert_action(target, action)?),
            HistoryEntry::Group(group) => {
                let description = group.description().to_string();
                let mut members: VecDeque<_> = group.into_actions().into();
                let member_count = members.len();
                while let Some(action) = members.pop_front() {
                    match revert_action(target, action) {
                        Ok(action) => reverted.push(action),
                        Err(err) => {
                            // Members not yet reverted stay available individually.
                            let stack = target.history_mut().stack_mut(source);
                            for action in members.into_iter().rev() {
                                stack.push_front(HistoryEntry::Action(action));
                            }
                            return Err(err);
                        }
                    }
                }
                target
                    .history_mut()
                    .group(register, member_count, description, false)?;
            }
        }
    }
    Ok(())
}

fn revert_action<T: Revertable>(
    target: &mut T,
    mut action: RevertableAction<T>,
) -> std::result::Result<RevertableAction<T>, T::Error> {
    target.history_mut().reverting = Some(action.description().to_string());
    let result = action.revert(target);
    target.history_mut().reverting = None;
    match result {
        Ok(()) => Ok(action),
        Err(err) => {
            warn!(
                description = action.description(),
                "Revert procedure failed, action dropped from history"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::sync::broadcast::Receiver;

    use super::*;
    use crate::testing::Sheet;

    fn drain(receiver: &mut Receiver<HistoryEvent>) -> Vec<HistoryEvent> {
        let mut events = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    #[test]
    fn test_register_without_register_is_ignored() {
        let mut sheet = Sheet::new(&["a"]);
        let mut events = sheet.history.subscribe();
        sheet.set(0, "b", None).unwrap();
        assert_eq!(sheet.rows, vec!["b"]);
        assert!(!sheet.can_undo());
        assert_eq!(sheet.history.counters(), ChangeCounters::default());
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn test_register_rejects_batch_registers() {
        let mut sheet = Sheet::new(&["a"]);
        let action = RevertableAction::new([Document::Main], "Edit", |_: &mut Sheet, _| Ok(()));
        let result = sheet.history.register(Some(Register::UndoMultiple), action);
        assert!(matches!(
            result,
            Err(HistoryError::InvalidRegister(Register::UndoMultiple))
        ));
        assert!(!sheet.can_undo());
    }

    #[test]
    fn test_register_rejects_overlapping_rows() {
        let mut sheet = Sheet::new(&["a"]);
        let action = RevertableAction::new([Document::Main], "Move", |_: &mut Sheet, _| Ok(()))
            .with_inserted_rows([1])
            .with_removed_rows([1]);
        let result = sheet.history.register(Some(Register::Do), action);
        assert!(matches!(result, Err(HistoryError::Validation(_))));
    }

    #[test]
    fn test_do_pushes_clears_redo_and_notifies() {
        let mut sheet = Sheet::new(&["a", "b"]);
        let mut events = sheet.history.subscribe();

        sheet.set(0, "x", Some(Register::Do)).unwrap();
        sheet.undo(1).unwrap();
        assert_eq!(sheet.history.redo_len(), 1);

        sheet.set(1, "y", Some(Register::Do)).unwrap();
        assert_eq!(sheet.history.redo_len(), 0);
        assert_eq!(sheet.history.undo_len(), 1);

        let events = drain(&mut events);
        let signals: Vec<Signal> = events.iter().map(HistoryEvent::signal).collect();
        assert_eq!(
            signals,
            vec![Signal::ActionDone, Signal::ActionUndone, Signal::ActionDone]
        );
        assert_eq!(events[2].action().changes.updated_main_texts(), &[1]);
    }

    #[test]
    fn test_emit_signal_off_registers_quietly() {
        let mut sheet = Sheet::new(&["a"]);
        let mut events = sheet.history.subscribe();
        sheet.quiet = true;
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        assert!(sheet.can_undo());
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn test_single_undo_and_redo() {
        let mut sheet = Sheet::new(&["a", "b"]);
        sheet.set(1, "c", Some(Register::Do)).unwrap();

        sheet.undo(1).unwrap();
        assert_eq!(sheet.rows, vec!["a", "b"]);
        assert!(!sheet.can_undo());
        assert!(sheet.can_redo());

        sheet.redo(1).unwrap();
        assert_eq!(sheet.rows, vec!["a", "c"]);
        assert!(sheet.can_undo());
        assert!(!sheet.can_redo());
    }

    #[test]
    fn test_undo_adopts_description_of_reverted_action() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        sheet
            .history
            .set_action_description(Some(Register::Do), "Fix typo");

        sheet.undo(1).unwrap();
        assert_eq!(sheet.history.redo_descriptions(), vec!["Fix typo"]);

        sheet.redo(1).unwrap();
        assert_eq!(sheet.history.undo_descriptions(), vec!["Fix typo"]);
    }

    #[test]
    fn test_batch_undo_emits_once() {
        let mut sheet = Sheet::new(&["a", "b", "c"]);
        sheet.set(0, "x", Some(Register::Do)).unwrap();
        sheet.remove(2, Some(Register::Do)).unwrap();
        sheet.set(1, "y", Some(Register::Do)).unwrap();
        let mut events = sheet.history.subscribe();

        sheet.undo(3).unwrap();
        assert_eq!(sheet.rows, vec!["a", "b", "c"]);
        assert_eq!(sheet.history.redo_len(), 3);

        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        let changes = &events[0].action().changes;
        assert_eq!(events[0].signal(), Signal::ActionUndone);
        assert_eq!(changes.inserted_rows(), &[2]);
        assert_eq!(changes.updated_main_texts(), &[0, 1]);
        assert!(!sheet.history.signals_blocked());
    }

    #[test]
    fn test_group_undo_redo_single_notification() {
        let mut sheet = Sheet::new(&["a", "b", "c"]);
        let mut events = sheet.history.subscribe();
        sheet.quiet = true;
        sheet.set(0, "x", Some(Register::Do)).unwrap();
        sheet.insert(1, "new", Some(Register::Do)).unwrap();
        sheet.set(3, "z", Some(Register::Do)).unwrap();
        sheet.quiet = false;
        sheet
            .history
            .group(Register::Do, 3, "Bulk edit", true)
            .unwrap();
        assert_eq!(sheet.history.undo_len(), 1);
        assert_eq!(drain(&mut events).len(), 1);

        sheet.undo(1).unwrap();
        assert_eq!(sheet.rows, vec!["a", "b", "c"]);
        assert_eq!(sheet.history.redo_len(), 1);
        assert_eq!(sheet.history.redo_descriptions(), vec!["Bulk edit"]);
        assert!(sheet.history.redoables().all(HistoryEntry::is_group));
        let undone = drain(&mut events);
        assert_eq!(undone.len(), 1);
        assert_eq!(undone[0].signal(), Signal::ActionUndone);

        sheet.redo(1).unwrap();
        assert_eq!(sheet.rows, vec!["x", "new", "b", "z"]);
        assert_eq!(sheet.history.undo_len(), 1);
        assert_eq!(sheet.history.undoables().next().unwrap().action_count(), 3);
        let redone = drain(&mut events);
        assert_eq!(redone.len(), 1);
        assert_eq!(redone[0].signal(), Signal::ActionRedone);
        assert_eq!(redone[0].action().changes.inserted_rows(), &[1]);
        assert_eq!(redone[0].action().changes.updated_main_texts(), &[0, 3]);
    }

    #[test]
    fn test_group_notification_in_registration_order() {
        let mut sheet = Sheet::new(&["a", "b"]);
        let mut events = sheet.history.subscribe();
        sheet.quiet = true;
        sheet.set(1, "x", Some(Register::Do)).unwrap();
        sheet.insert(0, "new", Some(Register::Do)).unwrap();
        sheet
            .history
            .group(Register::Do, 2, "Edit and insert", true)
            .unwrap();

        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        // The edit of row 1 happened before the insertion at row 0.
        assert_eq!(events[0].action().changes.updated_main_texts(), &[2]);
        assert_eq!(sheet.rows[2], "x");
    }

    #[test]
    fn test_group_requires_enough_entries() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        let result = sheet.history.group(Register::Do, 2, "Too many", true);
        assert!(matches!(
            result,
            Err(HistoryError::InsufficientEntries {
                requested: 2,
                available: 1
            })
        ));
        assert_eq!(sheet.history.undo_len(), 1);
    }

    #[test]
    fn test_undo_limit_keeps_most_recent() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.history.set_undo_limit(Some(3));
        for text in ["1", "2", "3", "4", "5"] {
            sheet.set(0, text, Some(Register::Do)).unwrap();
        }
        assert_eq!(sheet.history.undo_len(), 3);

        sheet.undo(3).unwrap();
        assert_eq!(sheet.rows, vec!["2"]);
        assert!(!sheet.can_undo());
    }

    #[test]
    fn test_counters_follow_register() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        assert_eq!(sheet.history.counters().main_changed, 1);
        assert_eq!(sheet.history.counters().tran_changed, 0);
        assert!(sheet.history.is_changed(Document::Main));

        sheet.undo(1).unwrap();
        assert_eq!(sheet.history.counters().main_changed, 0);
        sheet.redo(1).unwrap();
        assert_eq!(sheet.history.counters().main_changed, 1);

        sheet.history.mark_unchanged(Document::Main);
        assert!(!sheet.history.is_changed(Document::Main));
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut sheet = Sheet::new(&["a"]);
        assert!(matches!(sheet.undo(1), Err(HistoryError::NoMoreUndos)));
        assert!(matches!(sheet.redo(1), Err(HistoryError::NoMoreRedos)));
        assert!(sheet.undo(0).is_ok());
    }

    #[test]
    fn test_batch_larger_than_stack_mutates_nothing() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        assert!(matches!(sheet.undo(2), Err(HistoryError::NoMoreUndos)));
        assert_eq!(sheet.rows, vec!["b"]);
        assert_eq!(sheet.history.undo_len(), 1);
    }

    #[test]
    fn test_failed_revert_restores_notifications() {
        let mut sheet = Sheet::new(&["a", "b"]);
        sheet.set(0, "x", Some(Register::Do)).unwrap();
        sheet.broken(Some(Register::Do)).unwrap();
        let mut events = sheet.history.subscribe();

        let result = sheet.undo(2);
        assert!(matches!(result, Err(HistoryError::Validation(_))));
        assert!(!sheet.history.signals_blocked());
        // The failing action is gone, the older one is untouched.
        assert_eq!(sheet.history.undo_len(), 1);
        assert_eq!(sheet.history.redo_len(), 0);
        assert_eq!(sheet.rows, vec!["x", "b"]);
        assert!(drain(&mut events).is_empty());

        sheet.set(1, "y", Some(Register::Do)).unwrap();
        assert_eq!(drain(&mut events).len(), 1);
    }

    #[test]
    fn test_failed_group_member_leaves_rest_on_stack() {
        let mut sheet = Sheet::new(&["a", "b"]);
        sheet.quiet = true;
        sheet.set(0, "x", Some(Register::Do)).unwrap();
        sheet.broken(Some(Register::Do)).unwrap();
        sheet.set(1, "y", Some(Register::Do)).unwrap();
        sheet.history.group(Register::Do, 3, "Three", false).unwrap();
        let mut events = sheet.history.subscribe();

        assert!(sheet.undo(1).is_err());
        assert!(!sheet.history.signals_blocked());
        assert_eq!(sheet.rows, vec!["x", "b"]);
        assert_eq!(sheet.history.undo_descriptions(), vec!["Editing row"]);
        // The partial batch is still announced.
        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action().changes.updated_main_texts(), &[1]);
    }

    #[test]
    fn test_clear_drops_history() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.set(0, "b", Some(Register::Do)).unwrap();
        sheet.set(0, "c", Some(Register::Do)).unwrap();
        sheet.undo(1).unwrap();
        sheet.history.clear();
        assert!(!sheet.can_undo());
        assert!(!sheet.can_redo());
        assert_eq!(sheet.history.counters(), ChangeCounters::default());
    }

    #[test]
    fn test_signal_block_nests() {
        let sheet = Sheet::new(&[]);
        let outer = sheet.history.block_signals();
        {
            let _inner = sheet.history.block_signals();
            assert!(sheet.history.signals_blocked());
        }
        assert!(sheet.history.signals_blocked());
        drop(outer);
        assert!(!sheet.history.signals_blocked());
    }

    #[test]
    fn test_translation_only_action_activates_translation() {
        let mut sheet = Sheet::new(&["a"]);
        sheet.doc = Document::Translation;
        sheet.set(0, "t", Some(Register::Do)).unwrap();
        let counters = sheet.history.counters();
        assert!(counters.tran_active);
        assert_eq!(counters.tran_changed, 1);
        assert_eq!(counters.main_changed, 0);
    }
}
