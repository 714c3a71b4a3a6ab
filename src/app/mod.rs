//! Terminal editor hosting the abbreviation engine.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Every message is followed by [`Message::Tick`], which is when a
//! replacement scheduled by the expander reaches the buffer.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::store::AbbreviationStore;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    store: AbbreviationStore,
    watch_enabled: bool,
    expansion_enabled: bool,
}

impl App {
    /// Create an application editing `file_path` with abbreviations from `store`.
    pub const fn new(file_path: Option<PathBuf>, store: AbbreviationStore) -> Self {
        Self {
            file_path,
            store,
            watch_enabled: false,
            expansion_enabled: true,
        }
    }

    /// Reload abbreviations when their file changes.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Whether expansion starts switched on.
    #[must_use]
    pub const fn with_expansion_enabled(mut self, enabled: bool) -> Self {
        self.expansion_enabled = enabled;
        self
    }
}
