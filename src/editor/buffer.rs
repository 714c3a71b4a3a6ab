use std::ops::Range;

use ropey::Rope;

use super::transaction::{Change, EditError, EditOrigin, Transaction};

/// Maximum number of undo steps kept per buffer.
const MAX_HISTORY: usize = 100;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Document state captured before an edit.
#[derive(Debug, Clone)]
struct HistoryEntry {
    rope: Rope,
    cursor: Cursor,
}

/// A text buffer backed by a rope data structure.
///
/// Every mutation is atomic: it is recorded as one undo step and reported
/// back to the caller as a [`Transaction`]. Offsets in transactions are
/// character offsets into the whole document.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
    revision: u64,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            dirty: false,
            revision: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The cursor as a character offset into the document.
    pub fn cursor_offset(&self) -> usize {
        self.cursor_char_idx()
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Monotonic counter bumped by every mutation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of steps available to [`undo`](Self::undo).
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of characters in the buffer.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(line_idx).to_string();
        s.truncate(s.len() - line_break_len(&s));
        Some(s)
    }

    /// Largest char boundary of `line_idx` at or before byte `col`.
    fn clamp_col(&self, line_idx: usize, col: usize) -> usize {
        let line = self.line_at(line_idx).unwrap_or_default();
        if col >= line.len() {
            return line.len();
        }
        line.char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= col)
            .last()
            .unwrap_or(0)
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text in a character range, or `None` if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Option<String> {
        if range.start > range.end || range.end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(range).to_string())
    }

    /// Text between the start of the line containing `offset` and `offset`,
    /// together with the character offset where that line starts.
    pub fn line_text_before(&self, offset: usize) -> (usize, String) {
        let offset = offset.min(self.rope.len_chars());
        let line_start = self.rope.line_to_char(self.rope.char_to_line(offset));
        (line_start, self.rope.slice(line_start..offset).to_string())
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) -> Transaction {
        let at = self.cursor_char_idx();
        self.checkpoint();
        self.rope.insert_char(at, ch);
        self.set_cursor_offset(at + 1);
        self.commit(EditOrigin::Type, vec![Change::insert(at, ch)])
    }

    /// Insert pasted text at the cursor position.
    ///
    /// Returns `None` when `s` is empty.
    pub fn insert_str(&mut self, s: &str) -> Option<Transaction> {
        if s.is_empty() {
            return None;
        }
        let at = self.cursor_char_idx();
        self.checkpoint();
        self.rope.insert(at, s);
        self.set_cursor_offset(at + s.chars().count());
        Some(self.commit(EditOrigin::Paste, vec![Change::insert(at, s)]))
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) -> Transaction {
        let at = self.cursor_char_idx();
        self.checkpoint();
        self.rope.insert_char(at, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.commit(EditOrigin::Type, vec![Change::insert(at, '\n')])
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `None` if there was nothing to delete.
    pub fn delete_back(&mut self) -> Option<Transaction> {
        let at = self.cursor_char_idx();
        if at == 0 {
            return None;
        }
        self.checkpoint();
        self.rope.remove(at - 1..at);
        self.set_cursor_offset(at - 1);
        Some(self.commit(EditOrigin::Delete, vec![Change::delete(at - 1..at)]))
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `None` if the cursor is at the end of the buffer.
    pub fn delete_forward(&mut self) -> Option<Transaction> {
        let at = self.cursor_char_idx();
        if at >= self.rope.len_chars() {
            return None;
        }
        self.checkpoint();
        self.rope.remove(at..=at);
        Some(self.commit(EditOrigin::Delete, vec![Change::delete(at..at + 1)]))
    }

    /// Replace `range` with `text` as one edit and one undo step.
    ///
    /// When `expected` is given, the edit is refused unless the range
    /// currently holds exactly that text. The cursor ends up right after the
    /// inserted text.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::RangeOutOfBounds`] if the range does not fit the
    /// document and [`EditError::StaleRange`] if the range holds other text.
    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        text: &str,
        expected: Option<&str>,
    ) -> Result<Transaction, EditError> {
        let len = self.rope.len_chars();
        if range.start > range.end || range.end > len {
            return Err(EditError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if let Some(expected) = expected {
            let found = self.rope.slice(range.clone()).to_string();
            if found != expected {
                return Err(EditError::StaleRange {
                    expected: expected.to_string(),
                    found,
                });
            }
        }

        self.checkpoint();
        self.rope.remove(range.clone());
        self.rope.insert(range.start, text);
        self.set_cursor_offset(range.start + text.chars().count());
        Ok(self.commit(
            EditOrigin::Programmatic,
            vec![Change {
                from: range.start,
                to: range.end,
                insert: text.to_string(),
            }],
        ))
    }

    /// Revert the most recent edit.
    pub fn undo(&mut self) -> Option<Transaction> {
        let entry = self.undo_stack.pop()?;
        let current = HistoryEntry {
            rope: self.rope.clone(),
            cursor: self.cursor,
        };
        self.redo_stack.push(current);
        Some(self.restore(entry, EditOrigin::Undo))
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self) -> Option<Transaction> {
        let entry = self.redo_stack.pop()?;
        let current = HistoryEntry {
            rope: self.rope.clone(),
            cursor: self.cursor,
        };
        self.undo_stack.push(current);
        Some(self.restore(entry, EditOrigin::Redo))
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8));
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());

        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        self.cursor.set_col(self.clamp_col(self.cursor.line, col));
    }

    /// Move the cursor to a character offset, clamped to the document.
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let line_start = self.rope.line_to_char(line);
        let col = self.rope.line(line).char_to_byte(offset - line_start);
        self.cursor.line = line;
        self.cursor.set_col(col);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line = self.rope.line(self.cursor.line);
        let byte_col = self.cursor.col.min(line.len_bytes());
        line_start + line.byte_to_char(byte_col)
    }

    fn checkpoint(&mut self) {
        self.undo_stack.push(HistoryEntry {
            rope: self.rope.clone(),
            cursor: self.cursor,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    fn commit(&mut self, origin: EditOrigin, changes: Vec<Change>) -> Transaction {
        self.dirty = true;
        self.revision += 1;
        Transaction {
            origin,
            changes,
            cursor_after: self.cursor_char_idx(),
            revision: self.revision,
        }
    }

    fn restore(&mut self, entry: HistoryEntry, origin: EditOrigin) -> Transaction {
        let replaced = self.rope.len_chars();
        self.rope = entry.rope;
        self.cursor = entry.cursor;
        let change = Change {
            from: 0,
            to: replaced,
            insert: self.rope.to_string(),
        };
        self.commit(origin, vec![change])
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }
}

/// Byte length of the line break ending `line`, using ropey's line breaks.
fn line_break_len(line: &str) -> usize {
    if line.ends_with("\r\n") {
        return 2;
    }
    match line.chars().next_back() {
        Some(ch @ ('\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')) => {
            ch.len_utf8()
        }
        _ => 0,
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("undo_depth", &self.undo_stack.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(buf: &mut EditorBuffer, s: &str) {
        for ch in s.chars() {
            buf.insert_char(ch);
        }
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.char_count(), 0);
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_slice_bounds() {
        let buf = EditorBuffer::from_text("héllo");
        assert_eq!(buf.slice(1..3), Some("él".to_string()));
        assert_eq!(buf.slice(3..9), None);
    }

    #[test]
    fn test_line_text_before_uses_current_line_only() {
        let buf = EditorBuffer::from_text("first line\nsee you atm");
        let (start, text) = buf.line_text_before(buf.char_count());
        assert_eq!(start, 11);
        assert_eq!(text, "see you atm");
    }

    // --- Dirty and revision tracking ---

    #[test]
    fn test_new_buffer_is_clean() {
        let buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_insert_marks_dirty_and_bumps_revision() {
        let mut buf = EditorBuffer::from_text("hello");
        let txn = buf.insert_char('!');
        assert!(buf.is_dirty());
        assert_eq!(txn.revision, 1);
        assert_eq!(buf.revision(), 1);
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('!');
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    // --- Transactions ---

    #[test]
    fn test_insert_char_reports_typed_change() {
        let mut buf = EditorBuffer::from_text("atm");
        buf.move_end();
        let txn = buf.insert_char(' ');
        assert_eq!(txn.origin, EditOrigin::Type);
        assert_eq!(txn.changes, vec![Change::insert(3, " ")]);
        assert_eq!(txn.cursor_after, 4);
    }

    #[test]
    fn test_insert_str_reports_paste() {
        let mut buf = EditorBuffer::empty();
        let txn = buf.insert_str("hello world").unwrap();
        assert_eq!(txn.origin, EditOrigin::Paste);
        assert_eq!(txn.cursor_after, 11);
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(buf.insert_str("").is_none());
        assert!(!buf.is_dirty());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_reports_deleted_range() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        let txn = buf.delete_back().unwrap();
        assert_eq!(txn.origin, EditOrigin::Delete);
        assert_eq!(txn.changes, vec![Change::delete(4..5)]);
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_char_at_start() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('H');
        assert_eq!(buf.line_at(0), Some("Hhello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = EditorBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("helloé".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 7));
    }

    // --- Line splitting (Enter) ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(buf.delete_back().is_none());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        assert!(buf.delete_forward().is_none());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    // --- Range replacement ---

    #[test]
    fn test_replace_range_moves_cursor_after_insert() {
        let mut buf = EditorBuffer::from_text("see you atm ");
        let txn = buf.replace_range(8..12, "at the moment ", Some("atm ")).unwrap();
        assert_eq!(buf.text(), "see you at the moment ");
        assert_eq!(txn.origin, EditOrigin::Programmatic);
        assert_eq!(txn.cursor_after, 22);
        assert_eq!(buf.cursor_offset(), 22);
    }

    #[test]
    fn test_replace_range_out_of_bounds_is_rejected() {
        let mut buf = EditorBuffer::from_text("abc");
        let err = buf.replace_range(2..7, "x", None).unwrap_err();
        assert_eq!(
            err,
            EditError::RangeOutOfBounds {
                start: 2,
                end: 7,
                len: 3
            }
        );
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_replace_range_with_changed_text_is_rejected() {
        let mut buf = EditorBuffer::from_text("see you atx ");
        let err = buf.replace_range(8..12, "at the moment ", Some("atm ")).unwrap_err();
        assert!(matches!(err, EditError::StaleRange { .. }));
        assert_eq!(buf.text(), "see you atx ");
        assert_eq!(buf.undo_depth(), 0);
    }

    // --- Undo / redo ---

    #[test]
    fn test_replace_range_is_one_undo_step() {
        let mut buf = EditorBuffer::from_text("");
        type_str(&mut buf, "rn ");
        let depth = buf.undo_depth();
        buf.replace_range(0..3, "right now ", Some("rn ")).unwrap();
        assert_eq!(buf.undo_depth(), depth + 1);

        let txn = buf.undo().unwrap();
        assert_eq!(txn.origin, EditOrigin::Undo);
        assert_eq!(buf.text(), "rn ");
        assert_eq!(buf.cursor_offset(), 3);
    }

    #[test]
    fn test_redo_reapplies_undone_edit() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_end();
        buf.insert_char('c');
        buf.undo();
        assert_eq!(buf.text(), "ab");
        buf.redo();
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.cursor_offset(), 3);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_end();
        buf.insert_char('c');
        buf.undo();
        buf.insert_char('d');
        assert!(buf.redo().is_none());
        assert_eq!(buf.text(), "abd");
    }

    #[test]
    fn test_undo_on_fresh_buffer_is_none() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(buf.undo().is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut buf = EditorBuffer::empty();
        for _ in 0..(MAX_HISTORY + 20) {
            buf.insert_char('x');
        }
        assert_eq!(buf.undo_depth(), MAX_HISTORY);
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_vertical_move_lands_on_char_boundary() {
        let mut buf = EditorBuffer::from_text("abc\né");
        buf.move_to(0, 1);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 3));

        let mut buf = EditorBuffer::from_text("é€x\nabcd");
        buf.move_to(1, 3);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_to_snaps_inside_multibyte_char() {
        let mut buf = EditorBuffer::from_text("héllo");
        buf.move_to(0, 2);
        assert_eq!(buf.cursor().col, 1);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_unicode_line_separator_ends_line() {
        let mut buf = EditorBuffer::from_text("ab\u{2028}cd\nxyz");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_at(0).as_deref(), Some("ab"));
        assert_eq!(buf.line_len(0), 2);
        buf.move_to(2, 3);
        buf.move_cursor(Direction::Up);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 8);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_word_right_from_start() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_set_cursor_offset_maps_to_line_and_byte_col() {
        let mut buf = EditorBuffer::from_text("héllo\nwörld");
        buf.set_cursor_offset(8);
        assert_eq!(buf.cursor(), Cursor::at(1, 3));
        assert_eq!(buf.cursor_offset(), 8);
    }

    #[test]
    fn test_set_cursor_offset_clamps() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.set_cursor_offset(99);
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_move_to_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }
}
