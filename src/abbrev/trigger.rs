//! Deciding whether an edit should run detection.

use crate::editor::{EditOrigin, Transaction};

/// The keystroke that triggers expansion.
pub const TRIGGER: char = ' ';

/// If `txn` is a single typed space, the offset just after that space.
///
/// Pastes, programmatic edits, history navigation, newlines and
/// multi-character insertions never trigger.
pub fn trigger_offset(txn: &Transaction) -> Option<usize> {
    if txn.origin != EditOrigin::Type {
        return None;
    }
    let change = txn.single_change()?;
    let mut inserted = change.insert.chars();
    match (inserted.next(), inserted.next()) {
        (Some(TRIGGER), None) => Some(change.from + 1),
        _ => None,
    }
}
