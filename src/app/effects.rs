use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::{App, Message, Model, ToastLevel};
use crate::watcher::FileWatcher;

impl App {
    pub(super) fn make_file_watcher(&self) -> notify::Result<FileWatcher> {
        FileWatcher::new(self.store.path(), Duration::from_millis(200))
    }

    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Save => match save_buffer(model) {
                Ok(Some(path)) => {
                    model.show_toast(ToastLevel::Info, format!("Saved {path}"));
                    if model.quit_confirmed {
                        model.should_quit = true;
                    }
                }
                Ok(None) => model.show_toast(
                    ToastLevel::Warning,
                    "No file name: restart with `shorthand FILE` to save",
                ),
                Err(err) => {
                    tracing::error!(error = %format!("{err:#}"), "save failed");
                    model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
                }
            },
            Message::ReloadAbbreviations | Message::AbbreviationsChanged => {
                match self.store.reload() {
                    Ok(()) => {
                        self.store.publish(&mut model.expander);
                        let count = model.expander.table().len();
                        model.show_toast(
                            ToastLevel::Info,
                            format!("Loaded {count} abbreviations"),
                        );
                    }
                    Err(err) => {
                        tracing::error!(%err, "abbreviations reload failed");
                        model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Write the buffer to its file, returning the name written to.
fn save_buffer(model: &mut Model) -> Result<Option<String>> {
    let Some(path) = model.file_path.clone() else {
        return Ok(None);
    };
    std::fs::write(&path, model.buffer.text())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    model.buffer.mark_clean();
    tracing::debug!(path = %path.display(), "buffer saved");
    Ok(Some(model.file_name()))
}
