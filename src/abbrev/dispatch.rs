//! Deferred, single-slot application of replacements.
//!
//! Detection runs while the triggering edit is still being processed, so the
//! replacement is parked here and applied on the host's next tick. At most
//! one replacement is pending at a time; scheduling a new one or calling
//! [`Dispatcher::cancel`] drops the old one.

use std::ops::Range;

use crate::editor::{EditError, EditorBuffer};

/// A replacement instruction for the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range_start: usize,
    pub range_end: usize,
    pub insert_text: String,
    /// Text the range held when the replacement was computed.
    pub replaced_text: String,
}

impl Replacement {
    pub const fn range(&self) -> Range<usize> {
        self.range_start..self.range_end
    }

    /// Cursor offset once the replacement has been applied.
    pub fn cursor_after(&self) -> usize {
        self.range_start + self.insert_text.chars().count()
    }
}

/// Where replacements are applied.
pub trait EditTarget {
    /// Apply `replacement` as one atomic edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the range no longer holds
    /// [`Replacement::replaced_text`] or lies outside the document.
    fn apply_replacement(&mut self, replacement: &Replacement) -> Result<(), EditError>;
}

impl EditTarget for EditorBuffer {
    fn apply_replacement(&mut self, replacement: &Replacement) -> Result<(), EditError> {
        self.replace_range(
            replacement.range(),
            &replacement.insert_text,
            Some(&replacement.replaced_text),
        )
        .map(|_| ())
    }
}

/// A replacement waiting for the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub abbreviation: String,
    /// Entry text as stored, without the trailing trigger.
    pub expansion_text: String,
    pub replacement: Replacement,
}

/// What [`Dispatcher::flush`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was pending.
    Idle,
    Applied(PendingEdit),
    /// The target refused the edit; it was discarded.
    Dropped(PendingEdit, EditError),
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    pending: Option<PendingEdit>,
}

impl Dispatcher {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Park `edit` for the next tick, returning any edit it superseded.
    pub fn schedule(&mut self, edit: PendingEdit) -> Option<PendingEdit> {
        self.pending.replace(edit)
    }

    /// Drop the pending edit without applying it.
    pub const fn cancel(&mut self) -> Option<PendingEdit> {
        self.pending.take()
    }

    pub const fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the pending edit, if any, to `target`.
    ///
    /// Never fails: a rejected edit is logged and discarded.
    pub fn flush<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> DispatchOutcome {
        let Some(edit) = self.pending.take() else {
            return DispatchOutcome::Idle;
        };
        match target.apply_replacement(&edit.replacement) {
            Ok(()) => {
                tracing::debug!(
                    abbreviation = %edit.abbreviation,
                    start = edit.replacement.range_start,
                    end = edit.replacement.range_end,
                    "expansion applied"
                );
                DispatchOutcome::Applied(edit)
            }
            Err(err) => {
                tracing::debug!(abbreviation = %edit.abbreviation, %err, "expansion dropped");
                DispatchOutcome::Dropped(edit, err)
            }
        }
    }
}
