use std::borrow::Cow;
use std::sync::Arc;

use crate::editor::{EditorBuffer, Transaction};

use super::dispatch::{DispatchOutcome, Dispatcher, EditTarget, PendingEdit, Replacement};
use super::matcher::detect;
use super::table::AbbreviationTable;
use super::trigger::{TRIGGER, trigger_offset};

/// Read access to the document the engine scans.
pub trait DocumentView {
    /// Text from the start of the line containing `offset` up to `offset`,
    /// and the character offset where that line starts.
    fn line_text_before(&self, offset: usize) -> (usize, Cow<'_, str>);
}

impl DocumentView for EditorBuffer {
    fn line_text_before(&self, offset: usize) -> (usize, Cow<'_, str>) {
        let (start, text) = Self::line_text_before(self, offset);
        (start, Cow::Owned(text))
    }
}

impl DocumentView for str {
    fn line_text_before(&self, offset: usize) -> (usize, Cow<'_, str>) {
        let end_byte = self.char_indices().nth(offset).map_or(self.len(), |(i, _)| i);
        let head = &self[..end_byte];
        let line_byte = head.rfind('\n').map_or(0, |i| i + 1);
        let line_start = head[..line_byte].chars().count();
        (line_start, Cow::Borrowed(&head[line_byte..]))
    }
}

/// Receives a fresh table whenever the configuration changes.
pub trait AbbreviationsObserver {
    fn on_abbreviations_changed(&mut self, table: Arc<AbbreviationTable>);
}

/// An expansion that made it into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedExpansion {
    pub abbreviation: String,
    pub expansion_text: String,
}

/// Watches edits and expands abbreviations typed before a space.
///
/// Detection happens synchronously in [`Expander::on_transaction`]; the
/// resulting edit is applied by the host calling [`Expander::flush`] on its
/// next tick.
#[derive(Debug)]
pub struct Expander {
    table: Arc<AbbreviationTable>,
    dispatcher: Dispatcher,
    enabled: bool,
    last_expansion: Option<AppliedExpansion>,
}

impl Expander {
    pub const fn new(table: Arc<AbbreviationTable>) -> Self {
        Self {
            table,
            dispatcher: Dispatcher::new(),
            enabled: true,
            last_expansion: None,
        }
    }

    /// The table snapshot used for detection.
    pub const fn table(&self) -> &Arc<AbbreviationTable> {
        &self.table
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn expansion on or off. Turning it off drops any pending edit.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dispatcher.cancel();
        }
    }

    pub const fn pending(&self) -> Option<&PendingEdit> {
        self.dispatcher.pending()
    }

    /// Drop the pending edit, if any.
    pub fn cancel_pending(&mut self) -> Option<PendingEdit> {
        self.dispatcher.cancel()
    }

    pub const fn last_expansion(&self) -> Option<&AppliedExpansion> {
        self.last_expansion.as_ref()
    }

    /// Content-change notification from the host.
    ///
    /// `doc` must already contain the edit described by `txn`. Any edit
    /// supersedes a pending replacement; a typed space may schedule a new one.
    pub fn on_transaction<D>(&mut self, txn: &Transaction, doc: &D) -> Option<&PendingEdit>
    where
        D: DocumentView + ?Sized,
    {
        if let Some(stale) = self.dispatcher.cancel() {
            tracing::debug!(abbreviation = %stale.abbreviation, "pending expansion superseded");
        }
        if !self.enabled {
            return None;
        }
        let trigger = trigger_offset(txn)?;

        // The word ends right before the space that was just typed.
        let word_end = trigger - 1;
        let (line_start, line) = doc.line_text_before(word_end);
        let line_end = word_end - line_start;
        let location = detect(&line, line_end, &self.table)?;

        let start = line_start + location.start;
        let edit = PendingEdit {
            replacement: Replacement {
                range_start: start,
                range_end: trigger,
                insert_text: format!("{}{TRIGGER}", location.expansion.expansion_text),
                replaced_text: format!("{}{TRIGGER}", location.word),
            },
            abbreviation: location.abbreviation,
            expansion_text: location.expansion.expansion_text.clone(),
        };
        tracing::debug!(
            abbreviation = %edit.abbreviation,
            start,
            end = trigger,
            "abbreviation detected"
        );
        self.dispatcher.schedule(edit);
        self.dispatcher.pending()
    }

    /// Apply the pending edit to `target`. Called on the host's next tick.
    pub fn flush<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> DispatchOutcome {
        let outcome = self.dispatcher.flush(target);
        if let DispatchOutcome::Applied(edit) = &outcome {
            self.last_expansion = Some(AppliedExpansion {
                abbreviation: edit.abbreviation.clone(),
                expansion_text: edit.expansion_text.clone(),
            });
        }
        outcome
    }
}

impl AbbreviationsObserver for Expander {
    fn on_abbreviations_changed(&mut self, table: Arc<AbbreviationTable>) {
        tracing::debug!(entries = table.len(), "abbreviation table refreshed");
        self.table = table;
    }
}
