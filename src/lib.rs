// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. abbrev::AbbreviationTable)
    clippy::module_name_repetitions
)]

//! # Shorthand
//!
//! Abbreviation expansion for a text editor.
//!
//! Type an abbreviation such as `btw` followed by a space and it is replaced
//! with its expansion (`by the way `). Matching honors per-entry
//! case-sensitivity and enabled flags, the replacement is applied on the
//! editor's next tick, and it can be undone in one step.
//!
//! ## Modules
//!
//! - [`abbrev`]: Detection and replacement engine
//! - [`editor`]: Rope-backed host buffer with undo history
//! - [`store`]: Persisted abbreviation settings
//! - [`app`]: Terminal editor (TEA) hosting the engine
//! - [`ui`]: Terminal UI components
//! - [`config`]: Flag files and default paths
//! - [`logging`]: `tracing` subscriber setup
//! - [`watcher`]: Reload abbreviations when their file changes

pub mod abbrev;
pub mod app;
pub mod config;
pub mod editor;
pub mod logging;
pub mod store;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::abbrev::{AbbreviationTable, Expander, Expansion, default_abbreviations};
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{EditorBuffer, Transaction};
    pub use crate::store::AbbreviationStore;
}
