use crate::abbrev::DispatchOutcome;
use crate::editor::{Direction, Transaction};

use super::model::{Model, ToastLevel};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    InsertChar(char),
    /// Bracketed paste
    Paste(String),
    SplitLine,
    DeleteBack,
    DeleteForward,
    Undo,
    Redo,

    // Cursor
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,

    // Scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,

    // Abbreviations
    ToggleExpansion,
    /// Reload the abbreviations file (Ctrl+R)
    ReloadAbbreviations,
    /// The watched abbreviations file changed on disk
    AbbreviationsChanged,

    /// Next tick: apply the pending expansion, if any
    Tick,

    /// Write the buffer to its file
    Save,
    Resize(u16, u16),
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// File IO for `Save` and the abbreviation reloads happens in the event
/// loop's side-effect handler after this returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset quit confirmation on any action other than quit, except the
    // tick that follows every message and Save, which may complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save | Message::Tick) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::InsertChar(ch) => {
            let txn = model.buffer.insert_char(ch);
            notify_expander(&mut model, Some(txn));
        }
        Message::Paste(text) => {
            let txn = model.buffer.insert_str(&text);
            notify_expander(&mut model, txn);
        }
        Message::SplitLine => {
            let txn = model.buffer.split_line();
            notify_expander(&mut model, Some(txn));
        }
        Message::DeleteBack => {
            let txn = model.buffer.delete_back();
            notify_expander(&mut model, txn);
        }
        Message::DeleteForward => {
            let txn = model.buffer.delete_forward();
            notify_expander(&mut model, txn);
        }
        Message::Undo => {
            let txn = model.buffer.undo();
            if txn.is_none() {
                model.show_toast(ToastLevel::Info, "Nothing to undo");
            }
            notify_expander(&mut model, txn);
        }
        Message::Redo => {
            let txn = model.buffer.redo();
            if txn.is_none() {
                model.show_toast(ToastLevel::Info, "Nothing to redo");
            }
            notify_expander(&mut model, txn);
        }

        Message::MoveCursor(dir) => {
            model.buffer.move_cursor(dir);
            model.ensure_cursor_visible();
        }
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            model.ensure_cursor_visible();
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }

        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = (model.scroll_offset + n).min(model.max_scroll_offset());
        }
        Message::PageUp => {
            let page = model.text_rows().max(1);
            for _ in 0..page {
                model.buffer.move_cursor(Direction::Up);
            }
            model.scroll_offset = model.scroll_offset.saturating_sub(page);
            model.ensure_cursor_visible();
        }
        Message::PageDown => {
            let page = model.text_rows().max(1);
            for _ in 0..page {
                model.buffer.move_cursor(Direction::Down);
            }
            model.scroll_offset = (model.scroll_offset + page).min(model.max_scroll_offset());
            model.ensure_cursor_visible();
        }

        Message::ToggleExpansion => {
            let enabled = !model.expander.is_enabled();
            model.expander.set_enabled(enabled);
            let state = if enabled { "on" } else { "off" };
            model.show_toast(ToastLevel::Info, format!("Abbreviation expansion {state}"));
        }

        Message::Tick => match model.expander.flush(&mut model.buffer) {
            DispatchOutcome::Applied(_) => model.ensure_cursor_visible(),
            DispatchOutcome::Idle | DispatchOutcome::Dropped(..) => {}
        },

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.ensure_cursor_visible();
        }
        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }

        // Side effects only
        Message::ReloadAbbreviations | Message::AbbreviationsChanged | Message::Save => {}
    }
    model
}

/// Report a buffer edit to the expander and keep the cursor on screen.
fn notify_expander(model: &mut Model, txn: Option<Transaction>) {
    let Some(txn) = txn else {
        return;
    };
    model.expander.on_transaction(&txn, &model.buffer);
    model.ensure_cursor_visible();
}
