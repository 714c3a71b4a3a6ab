//! Backward word-boundary scanning.
//!
//! Offsets are character offsets, never byte offsets, so callers can pass
//! positions straight from the editor buffer.

/// Whether `ch` separates words.
pub fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace()
}

/// Start offset of the run of non-whitespace characters ending at `end`.
///
/// Always returns `start <= end`. An `end` past the text is clamped to the
/// text length first.
pub fn word_start(text: &str, end: usize) -> usize {
    word_before(text, end).0
}

/// The word ending at `end` and its start offset.
///
/// The word is empty when `end` is 0 or the character right before `end` is
/// whitespace.
pub fn word_before(text: &str, end: usize) -> (usize, &str) {
    let end_byte = text.char_indices().nth(end).map_or(text.len(), |(i, _)| i);
    let head = &text[..end_byte];
    let start_byte = head
        .char_indices()
        .rev()
        .find(|&(_, ch)| is_word_boundary(ch))
        .map_or(0, |(i, ch)| i + ch.len_utf8());
    let start = head[..start_byte].chars().count();
    (start, &head[start_byte..])
}
