use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::abbrev::{AbbreviationTable, Expander};
use crate::editor::EditorBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// File the buffer is saved to; `None` for a scratch buffer
    pub file_path: Option<PathBuf>,
    pub buffer: EditorBuffer,
    /// Abbreviation engine attached to `buffer`
    pub expander: Expander,
    /// Line index of the first visible line
    pub scroll_offset: usize,
    /// Terminal size (columns, rows)
    pub terminal_size: (u16, u16),
    /// Whether the abbreviations file is watched for changes
    pub watch_enabled: bool,
    toast: Option<Toast>,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("dirty", &self.buffer.is_dirty())
            .field("expander", &self.expander)
            .field("watch_enabled", &self.watch_enabled)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(
        file_path: Option<PathBuf>,
        buffer: EditorBuffer,
        table: Arc<AbbreviationTable>,
        terminal_size: (u16, u16),
    ) -> Self {
        Self {
            file_path,
            buffer,
            expander: Expander::new(table),
            scroll_offset: 0,
            terminal_size,
            watch_enabled: false,
            toast: None,
            quit_confirmed: false,
            should_quit: false,
        }
    }

    /// Rows available for text (everything but the status bar).
    pub const fn text_rows(&self) -> usize {
        self.terminal_size.1.saturating_sub(1) as usize
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string())
    }

    /// Scroll so the cursor line is on screen.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let cursor_line = self.buffer.cursor().line;
        let visible_height = self.text_rows();
        if visible_height == 0 {
            self.scroll_offset = cursor_line;
            return;
        }
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + visible_height {
            self.scroll_offset = cursor_line + 1 - visible_height;
        }
    }

    pub(super) fn max_scroll_offset(&self) -> usize {
        self.buffer.line_count().saturating_sub(1)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(
            None,
            EditorBuffer::empty(),
            Arc::new(AbbreviationTable::new()),
            (80, 24),
        )
    }
}
