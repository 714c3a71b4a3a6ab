//! Lightweight editor module hosting the abbreviation engine.
//!
//! Provides a rope-backed text buffer with cursor management and undo
//! history. Every edit is reported as a [`Transaction`], which is what the
//! engine listens to.

mod buffer;
mod transaction;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use transaction::{Change, EditError, EditOrigin, Transaction};
