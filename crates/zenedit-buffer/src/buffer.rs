//! Core text buffer implementation using rope data structure.
//!
//! ## Why Rope?
//!
//! The editor rewrites the whole document for replace-all and line
//! numbering, but ordinary typing touches a few characters at a time.
//! Ropes keep both cheap: O(log n) inserts/deletes and cheap line indexing.
//!
//! ## Learning: Ownership in Action
//!
//! ```rust,ignore
//! let buffer = TextBuffer::new();  // buffer OWNS the rope
//! let text = buffer.text();        // text BORROWS from buffer
//! // buffer.insert(0, "x");        // ERROR! Can't mutate while borrowed
//! drop(text);                      // Release borrow
//! buffer.insert(0, "x");           // Now OK!
//! ```

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::history::{Edit, EditKind, History};
use crate::{BufferError, BufferResult, Position};

/// A text buffer backed by a rope, with its own undo/redo history.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync`; it belongs to the single owner
/// of the document.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Edit history for undo/redo
    history: History,

    /// Whether the buffer changed since it was loaded or last saved
    modified: bool,
}

/// Undo groups kept before the oldest is dropped.
const MAX_HISTORY: usize = 1000;

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use zenedit_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(MAX_HISTORY),
            modified: false,
        }
    }

    // ==================== Text Access ====================

    /// Returns the entire text content as a `Cow<str>`.
    ///
    /// # Learning: Cow (Clone-on-Write)
    ///
    /// For small buffers this borrows a single rope chunk.
    /// Larger buffers spanning several chunks allocate.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines as a user sees them.
    ///
    /// An empty buffer has one line, and a trailing newline terminates the
    /// last line rather than starting a new one.
    pub fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        let len = self.rope.len_chars();
        if lines > 1 && self.rope.char(len - 1) == '\n' {
            lines - 1
        } else {
            lines
        }
    }

    /// Returns the character range of a line (0-indexed), without its
    /// line terminator.
    pub fn line_span(&self, line_idx: usize) -> BufferResult<Range<usize>> {
        if line_idx >= self.rope.len_lines() {
            return Err(BufferError::LineOutOfBounds(line_idx));
        }
        let start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        Ok(start..start + len)
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    ///
    /// # Learning: `&mut self`
    ///
    /// This method requires exclusive (mutable) access to the buffer.
    /// The borrow checker ensures no other code can read or write
    /// the buffer while this method executes.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        self.modified = true;

        Ok(())
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        self.modified = true;

        Ok(deleted)
    }

    /// Replaces text in a range with new text as a single undo step.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        self.history.begin_group();
        let result = self
            .delete(range.clone())
            .and_then(|deleted| self.insert(range.start, text).map(|()| deleted));
        self.history.end_group();
        result
    }

    /// Replaces the whole content as a single undo step.
    ///
    /// Does nothing (and does not mark the buffer modified) when the
    /// content is unchanged.
    pub fn set_text(&mut self, text: &str) -> BufferResult<()> {
        if self.text() == text {
            return Ok(());
        }
        let len = self.len_chars();
        self.replace(0..len, text).map(|_| ())
    }

    /// Loads new content wholesale: history is cleared and the buffer is
    /// considered unmodified afterwards.
    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.history.clear();
        self.modified = false;
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit group.
    ///
    /// # Learning: State Management
    ///
    /// Each group is popped from the undo stack and its edits are reverted
    /// back to front, so positions recorded in later edits are still valid
    /// when they are reverted.
    pub fn undo(&mut self) -> BufferResult<()> {
        let edits = self.history.undo().ok_or(BufferError::NothingToUndo)?;
        for edit in edits.iter().rev() {
            self.apply(&edit.inverse());
        }
        self.modified = true;
        Ok(())
    }

    /// Redoes the last undone edit group.
    pub fn redo(&mut self) -> BufferResult<()> {
        let edits = self.history.redo().ok_or(BufferError::NothingToRedo)?;
        for edit in &edits {
            self.apply(edit);
        }
        self.modified = true;
        Ok(())
    }

    /// Applies an edit WITHOUT recording it to history.
    fn apply(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => self.rope.insert(edit.position, &edit.content),
            EditKind::Delete => {
                let end = edit.position + edit.char_len();
                self.rope.remove(edit.position..end);
            }
        }
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Position Conversion ====================

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);

        Ok(Position::new(line, char_idx - line_start))
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Marks the current content as persisted.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.reset(s);
        buffer
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_ignores_trailing_newline() {
        assert_eq!(TextBuffer::new().line_count(), 1);
        assert_eq!(TextBuffer::from("a").line_count(), 1);
        assert_eq!(TextBuffer::from("a\n").line_count(), 1);
        assert_eq!(TextBuffer::from("a\nb").line_count(), 2);
        assert_eq!(TextBuffer::from("a\n\n").line_count(), 2);
    }

    #[test]
    fn test_line_span_strips_crlf() {
        let buffer = TextBuffer::from("one\r\ntwo");
        assert_eq!(buffer.line_span(0).unwrap(), 0..3);
        assert_eq!(buffer.line_span(1).unwrap(), 5..8);
        assert!(buffer.line_span(2).is_err());
    }

    #[test]
    fn test_set_text_is_one_undo_step() {
        let mut buffer = TextBuffer::from("hello");
        buffer.set_text("goodbye").unwrap();
        assert_eq!(buffer.text(), "goodbye");
        assert!(buffer.is_modified());

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "hello");
        assert!(!buffer.can_undo());

        buffer.redo().unwrap();
        assert_eq!(buffer.text(), "goodbye");
    }

    #[test]
    fn test_set_text_unchanged_is_noop() {
        let mut buffer = TextBuffer::from("same");
        buffer.set_text("same").unwrap();
        assert!(!buffer.is_modified());
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_reset_clears_history_and_flag() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "draft").unwrap();
        buffer.reset("loaded");
        assert_eq!(buffer.text(), "loaded");
        assert!(!buffer.is_modified());
        assert!(matches!(buffer.undo(), Err(BufferError::NothingToUndo)));
    }

    #[test]
    fn test_position_conversion() {
        let buffer = TextBuffer::from("ab\ncd");
        assert_eq!(buffer.char_idx_to_position(4).unwrap(), Position::new(1, 1));
        assert_eq!(buffer.char_idx_to_position(5).unwrap(), Position::new(1, 2));
        assert!(buffer.char_idx_to_position(6).is_err());
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let mut buffer = TextBuffer::from("abc");
        assert!(buffer.insert(4, "x").is_err());
        assert!(buffer.delete(1..9).is_err());
        assert!(!buffer.is_modified());
    }
}
