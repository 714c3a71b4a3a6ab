//! Abbreviation detection and replacement.
//!
//! The pipeline runs once per edit:
//!
//! 1. [`trigger`] decides whether the edit was a typed space.
//! 2. [`scanner`] finds the word right before it.
//! 3. [`matcher`] resolves the word against the [`AbbreviationTable`].
//! 4. [`dispatch`] parks the replacement until the host's next tick.
//!
//! [`Expander`] ties the steps together for a host editor.

pub mod dispatch;
pub mod engine;
pub mod matcher;
pub mod scanner;
pub mod table;
pub mod trigger;

pub use dispatch::{DispatchOutcome, Dispatcher, EditTarget, PendingEdit, Replacement};
pub use engine::{AbbreviationsObserver, AppliedExpansion, DocumentView, Expander};
pub use matcher::{AbbreviationLocation, Resolution, detect, find_candidate, resolve};
pub use scanner::{is_word_boundary, word_before, word_start};
pub use table::{AbbreviationTable, Expansion, default_abbreviations};
pub use trigger::{TRIGGER, trigger_offset};
