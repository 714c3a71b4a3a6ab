//! Edit transactions emitted by [`EditorBuffer`](super::EditorBuffer).
//!
//! Every mutation of the buffer produces exactly one [`Transaction`]
//! describing what changed and who asked for it. Listeners such as the
//! abbreviation engine inspect the most recent transaction to decide whether
//! to react.

use std::ops::Range;

/// Who initiated an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// A keystroke typed by the user.
    Type,
    /// Text pasted by the user.
    Paste,
    /// Backspace / Delete.
    Delete,
    /// An edit issued by code rather than the keyboard.
    Programmatic,
    /// History navigation.
    Undo,
    Redo,
}

/// A single replaced span, in character offsets of the document *before* the
/// edit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    /// A pure insertion at `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            from: at,
            to: at,
            insert: text.into(),
        }
    }

    /// A pure deletion of `range`.
    pub const fn delete(range: Range<usize>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            insert: String::new(),
        }
    }
}

/// The record of one atomic edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub origin: EditOrigin,
    pub changes: Vec<Change>,
    /// Cursor position (character offset) after the edit.
    pub cursor_after: usize,
    /// Buffer revision after the edit.
    pub revision: u64,
}

impl Transaction {
    /// The only change in this transaction, if it has exactly one.
    pub fn single_change(&self) -> Option<&Change> {
        match self.changes.as_slice() {
            [change] => Some(change),
            _ => None,
        }
    }
}

/// Reasons the buffer refuses an edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("range {start}..{end} is outside the document (length {len})")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("expected {expected:?} in range but found {found:?}")]
    StaleRange { expected: String, found: String },
}
