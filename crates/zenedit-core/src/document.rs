//! The single document being edited.
//!
//! ## Learning: Composition over Inheritance
//!
//! Rust doesn't have inheritance. Instead, `Document` composes
//! a `TextBuffer` and a `Cursor` and adds file binding on top.

use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};

use zenedit_buffer::{Cursor, TextBuffer};

use crate::persist::write_atomic;
use crate::{CoreError, CoreResult};

/// Name shown for a document with no file behind it.
pub const UNTITLED: &str = "Untitled";

/// Where the document stands with respect to its file.
///
/// ## Learning: Enums as State Machines
///
/// Carrying the path inside the bound variants makes "bound but no path"
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    UntitledUnmodified,
    UntitledModified,
    BoundUnmodified(PathBuf),
    BoundModified(PathBuf),
}

impl DocumentState {
    pub fn is_modified(&self) -> bool {
        matches!(self, Self::UntitledModified | Self::BoundModified(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::BoundUnmodified(path) | Self::BoundModified(path) => Some(path),
            _ => None,
        }
    }
}

/// A document: text, caret and the file it is bound to.
#[derive(Debug, Default)]
pub struct Document {
    /// The underlying text buffer
    buffer: TextBuffer,

    /// Caret and selection
    cursor: Cursor,

    /// File path (None until the first open or save)
    path: Option<PathBuf>,
}

impl Document {
    /// Creates a new empty, untitled document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document from a file.
    ///
    /// The caret starts at the beginning and the history is empty.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;

        let mut buffer = TextBuffer::new();
        buffer.reset(&text);

        Ok(Self {
            buffer,
            cursor: Cursor::new(0),
            path: Some(path.to_path_buf()),
        })
    }

    // ==================== Getters ====================

    /// Returns the bound file path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the display name: the file name, or "Untitled".
    pub fn name(&self) -> Cow<'_, str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy())
            .unwrap_or(Cow::Borrowed(UNTITLED))
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn state(&self) -> DocumentState {
        match (&self.path, self.is_modified()) {
            (None, false) => DocumentState::UntitledUnmodified,
            (None, true) => DocumentState::UntitledModified,
            (Some(path), false) => DocumentState::BoundUnmodified(path.clone()),
            (Some(path), true) => DocumentState::BoundModified(path.clone()),
        }
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns all text.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the caret offset in characters.
    pub fn caret(&self) -> usize {
        self.cursor.head
    }

    /// Returns the line count (see [`TextBuffer::line_count`]).
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    // ==================== File Operations ====================

    /// Writes the text exactly as held to `path`, then binds to it.
    ///
    /// On failure nothing changes.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.write_snapshot(path)?;
        self.path = Some(path.to_path_buf());
        self.buffer.mark_saved();
        Ok(())
    }

    /// Writes the text to `path` without binding or clearing the modified
    /// flag.
    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        write_atomic(path, self.text().as_bytes()).map_err(|e| CoreError::io(path, e))
    }

    // ==================== Text Editing ====================

    /// Inserts text at the caret, replacing the selection if there is one.
    ///
    /// The caret ends up after the inserted text.
    pub fn insert_at_cursor(&mut self, text: &str) -> CoreResult<()> {
        let start = match self.cursor.selection() {
            Some(range) => {
                let start = range.start;
                self.buffer.replace(range, text)?;
                start
            }
            None => {
                let at = self.cursor.head;
                self.buffer.insert(at, text)?;
                at
            }
        };
        self.cursor.move_to(start + text.chars().count());
        Ok(())
    }

    /// Deletes the current selection, returning the removed text.
    pub fn delete_selection(&mut self) -> CoreResult<Option<String>> {
        let Some(range) = self.cursor.selection() else {
            return Ok(None);
        };
        let start = range.start;
        let deleted = self.buffer.delete(range)?;
        self.cursor.move_to(start);
        Ok(Some(deleted))
    }

    /// Returns the selected text.
    pub fn selected_text(&self) -> Option<String> {
        self.cursor
            .selection()
            .and_then(|range| self.buffer.slice(range).ok())
            .map(Cow::into_owned)
    }

    /// Replaces the whole text as one undo step.
    ///
    /// The selection is cleared and the caret kept in bounds. Identical
    /// text is a no-op.
    pub fn replace_text(&mut self, text: &str) -> CoreResult<()> {
        self.buffer.set_text(text)?;
        self.cursor.clear_selection();
        self.cursor.clamp(self.buffer.len_chars());
        Ok(())
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit group. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let undone = self.buffer.undo().is_ok();
        self.cursor.clamp(self.buffer.len_chars());
        undone
    }

    /// Redoes the last undone edit group. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let redone = self.buffer.redo().is_ok();
        self.cursor.clamp(self.buffer.len_chars());
        redone
    }

    // ==================== Selection ====================

    /// Moves the caret, clearing the selection.
    pub fn move_caret(&mut self, offset: usize) {
        self.cursor.move_to(offset.min(self.buffer.len_chars()));
    }

    /// Selects a range and puts the caret at its end.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.buffer.len_chars();
        self.cursor.select(range.start.min(len), range.end.min(len));
    }

    /// Selects all text.
    pub fn select_all(&mut self) {
        self.select(0..self.buffer.len_chars());
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.cursor.clear_selection();
    }

    /// Selects line `line` (1-based) without its newline, caret at its start.
    ///
    /// Out-of-range lines (0 or past the last) leave everything unchanged
    /// and return false.
    pub fn goto_line(&mut self, line: usize) -> bool {
        if line == 0 || line > self.line_count() {
            return false;
        }
        match self.buffer.line_span(line - 1) {
            Ok(span) => {
                self.cursor.select(span.end, span.start);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        let mut doc = Document::new();
        doc.insert_at_cursor(text).unwrap();
        doc
    }

    #[test]
    fn test_state_machine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");

        let mut doc = Document::new();
        assert_eq!(doc.state(), DocumentState::UntitledUnmodified);
        assert_eq!(doc.name(), "Untitled");

        doc.insert_at_cursor("hi").unwrap();
        assert_eq!(doc.state(), DocumentState::UntitledModified);

        doc.save_to(&path).unwrap();
        assert_eq!(doc.state(), DocumentState::BoundUnmodified(path.clone()));
        assert_eq!(doc.name(), "a.txt");

        doc.insert_at_cursor("!").unwrap();
        assert_eq!(doc.state(), DocumentState::BoundModified(path));
    }

    #[test]
    fn test_save_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");
        let text = "line one\r\nline two\n\tü and no final newline";

        let mut doc = doc(text);
        doc.save_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());

        let reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.text(), text);
        assert!(!reopened.is_modified());
        assert_eq!(reopened.caret(), 0);
        assert!(!reopened.buffer().can_undo());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        std::fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut doc = Document::open(&link).unwrap();
        doc.insert_at_cursor("new ").unwrap();
        doc.save_to(&link).unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "new old");
        assert_eq!(doc.path(), Some(link.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut doc = Document::open(&path).unwrap();
        doc.move_caret(doc.buffer().len_chars());
        doc.insert_at_cursor("echo hi\n").unwrap();
        doc.save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#!/bin/sh\necho hi\n");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::open(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_failed_save_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = doc("keep");

        let err = doc.save_to(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
        assert_eq!(doc.state(), DocumentState::UntitledModified);
    }

    #[test]
    fn test_snapshot_keeps_modified_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.txt");
        let doc = doc("draft");

        doc.write_snapshot(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "draft");
        assert_eq!(doc.state(), DocumentState::UntitledModified);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut doc = doc("hello world");
        doc.select(0..5);
        doc.insert_at_cursor("goodbye").unwrap();
        assert_eq!(doc.text(), "goodbye world");
        assert_eq!(doc.caret(), 7);
        assert!(doc.selected_text().is_none());

        assert!(doc.undo());
        assert_eq!(doc.text(), "hello world");
    }

    #[test]
    fn test_delete_selection() {
        let mut doc = doc("abcdef");
        assert_eq!(doc.delete_selection().unwrap(), None);

        doc.select(1..4);
        assert_eq!(doc.selected_text().as_deref(), Some("bcd"));
        assert_eq!(doc.delete_selection().unwrap().as_deref(), Some("bcd"));
        assert_eq!(doc.text(), "aef");
        assert_eq!(doc.caret(), 1);
    }

    #[test]
    fn test_goto_line() {
        let mut doc = doc("first\nsecond\nthird\n");
        assert_eq!(doc.line_count(), 3);

        assert!(doc.goto_line(2));
        assert_eq!(doc.selected_text().as_deref(), Some("second"));
        assert_eq!(doc.caret(), 6);
    }

    #[test]
    fn test_goto_line_out_of_range() {
        let mut doc = doc("a\nb\n");
        doc.select(0..1);
        let before = doc.cursor();

        assert!(!doc.goto_line(0));
        assert!(!doc.goto_line(3));
        assert_eq!(doc.cursor(), before);
    }

    #[test]
    fn test_replace_text_clamps_caret() {
        let mut doc = doc("a long line of text");
        doc.replace_text("short").unwrap();
        assert_eq!(doc.caret(), 5);
        assert!(doc.is_modified());

        assert!(doc.undo());
        assert_eq!(doc.text(), "a long line of text");
        assert!(doc.redo());
        assert_eq!(doc.text(), "short");
    }

    #[test]
    fn test_undo_nothing() {
        let mut doc = Document::new();
        assert!(!doc.undo());
        assert!(!doc.redo());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_save_then_open_is_byte_exact(text in "[a-zü \t\r\n]{0,60}") {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("p.txt");

                let mut saved = doc(&text);
                saved.save_to(&path).unwrap();
                prop_assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());
                let reopened = Document::open(&path).unwrap();
                prop_assert_eq!(reopened.text(), text.as_str());
            }

            #[test]
            fn prop_goto_past_end_changes_nothing(
                text in "[a-z\n]{0,40}",
                extra in 1usize..5,
                caret in 0usize..40,
            ) {
                let mut doc = doc(&text);
                doc.move_caret(caret.min(doc.buffer().len_chars()));
                let before = doc.cursor();

                prop_assert!(!doc.goto_line(doc.line_count() + extra));
                prop_assert_eq!(doc.cursor(), before);
            }
        }
    }
}
