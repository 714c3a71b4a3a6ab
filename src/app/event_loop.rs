use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::editor::EditorBuffer;
use crate::watcher::FileWatcher;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot be
    /// initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let buffer = self.load_buffer()?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: shorthand requires an interactive terminal")?;
        let size = terminal.size()?;
        execute!(stdout(), EnableBracketedPaste, EnableMouseCapture)?;

        let mut model = Model::new(
            self.file_path.clone(),
            buffer,
            self.store.snapshot(),
            (size.width, size.height),
        );
        model.watch_enabled = self.watch_enabled;
        model.expander.set_enabled(self.expansion_enabled);
        tracing::debug!(
            file = ?self.file_path,
            abbreviations = %self.store.path().display(),
            "editor started"
        );

        let result = self.event_loop(&mut terminal, &mut model);

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn load_buffer(&self) -> Result<EditorBuffer> {
        let Some(path) = &self.file_path else {
            return Ok(EditorBuffer::empty());
        };
        if !path.exists() {
            return Ok(EditorBuffer::empty());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(EditorBuffer::from_text(&text))
    }

    /// Apply `msg`, run its side effects, then tick.
    pub(super) fn process(&mut self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
        *model = update(std::mem::take(model), Message::Tick);
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut file_watcher = if model.watch_enabled {
            match self.make_file_watcher() {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    model.watch_enabled = false;
                    model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                    tracing::warn!(%err, path = %self.store.path().display(), "cannot watch abbreviations");
                    None
                }
            }
        } else {
            None
        };
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if file_watcher
                .as_mut()
                .is_some_and(FileWatcher::take_change_ready)
            {
                self.process(model, Message::AbbreviationsChanged);
                needs_render = true;
            }

            let poll_ms = if needs_render { 0 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                if let Some(msg) = Self::handle_event(&event::read()?) {
                    tracing::trace!(?msg, "message");
                    self.process(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = Self::handle_event(&event::read()?) {
                        self.process(model, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
