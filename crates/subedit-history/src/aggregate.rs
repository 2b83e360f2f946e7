//! Net row effect of a batch of actions
//!
//! Observers must see row indices that are valid after the whole batch was
//! applied. Updated rows recorded by earlier actions are therefore shifted by
//! the insertions and removals of later actions, and dropped when their row
//! was removed.

use crate::action::{RevertableAction, RowChanges};
use crate::manager::Revertable;
use crate::register::Register;

/// Summarise row deltas applied in the given order
///
/// When `register` reverts, each action's removed rows count as inserted and
/// its inserted rows as removed.
pub fn aggregate<'a, I>(changes: I, register: Register) -> RowChanges
where
    I: IntoIterator<Item = &'a RowChanges>,
{
    let revert = register.is_revert();
    let mut total = RowChanges::new();

    for change in changes {
        let (inserted, removed) = if revert {
            (change.removed_rows(), change.inserted_rows())
        } else {
            (change.inserted_rows(), change.removed_rows())
        };

        if let Some(&first_removed) = removed.first() {
            for rows in total.updated_mut() {
                rows.retain(|row| removed.binary_search(row).is_err());
                for row in rows.iter_mut() {
                    if *row > first_removed {
                        // Removed rows need not be contiguous.
                        *row -= removed.partition_point(|&r| r < *row);
                    }
                }
            }
        }

        for &inserted_row in inserted {
            for rows in total.updated_mut() {
                for row in rows.iter_mut().filter(|row| **row >= inserted_row) {
                    *row += 1;
                }
            }
        }

        total.inserted_mut().extend_from_slice(inserted);
        total.removed_mut().extend_from_slice(removed);
        for (rows, own) in total.updated_mut().into_iter().zip(change.updated()) {
            rows.extend_from_slice(own);
        }
    }

    total.normalize();
    total
}

/// Build the synthetic action emitted for a batch
pub fn notification_action<'a, T, I>(actions: I, register: Register) -> RevertableAction<T>
where
    T: Revertable + 'a,
    I: IntoIterator<Item = &'a RevertableAction<T>>,
{
    let changes = aggregate(actions.into_iter().map(|action| action.changes()), register);
    RevertableAction::notification(register, changes)
}
