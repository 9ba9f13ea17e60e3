//! # ZenEdit Buffer
//!
//! The text widget underneath the editor: a rope-backed buffer with its own
//! edit history, a caret with an optional selection anchor, and the plain
//! text algorithms the editor runs over the whole document.
//!
//! ## Key Concepts
//!
//! - All offsets are **character** offsets, never byte offsets. Search
//!   results, caret positions and selections can be fed straight back into
//!   the buffer.
//! - The buffer owns its undo/redo history. Callers never build edit
//!   records themselves; they mutate the buffer and call `undo`/`redo`.
//! - `search` and `transform` are pure functions over `&str` so they can be
//!   tested and benchmarked without a buffer.

mod buffer;
mod cursor;
mod history;
pub mod search;
pub mod transform;

pub use buffer::TextBuffer;
pub use cursor::{Cursor, Position};
pub use history::{Edit, EditGroup, EditKind, History};
pub use search::{Match, Replaced};
pub use transform::TextStats;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Line {0} is out of bounds")]
    LineOutOfBounds(usize),

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_buffer_from_string() {
        let buffer = TextBuffer::from("Hello, World!");
        assert_eq!(buffer.len_chars(), 13);
        assert_eq!(buffer.text(), "Hello, World!");
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        assert_eq!(buffer.text(), "Hello");

        buffer.insert(5, ", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        buffer.delete(5..7).unwrap();
        assert_eq!(buffer.text(), "HelloWorld!");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        buffer.insert(5, "\nWorld").unwrap();

        assert_eq!(buffer.text(), "Hello\nWorld");

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "Hello");

        buffer.redo().unwrap();
        assert_eq!(buffer.text(), "Hello\nWorld");
    }

    #[test]
    fn test_line_operations() {
        let buffer = TextBuffer::from("Line 1\nLine 2\nLine 3");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_span(0).unwrap(), 0..6);
        assert_eq!(buffer.slice(14..20).unwrap(), "Line 3");
        assert_eq!(buffer.line_span(1).unwrap(), 7..13);
    }
}
