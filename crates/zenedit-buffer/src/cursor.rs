//! Caret and position types.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` wraps line/column coordinates instead of a bare
//! `(usize, usize)`, so line and column can't be swapped by accident.
//! The caret itself is stored as character offsets, which stay valid
//! across whole-document rewrites once clamped.

use std::ops::Range;

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The insertion caret with an optional selection anchor.
///
/// When `anchor` is set, the text between `anchor` and `head` is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Caret offset in characters
    pub head: usize,
    /// Selection anchor offset, if selecting
    pub anchor: Option<usize>,
}

impl Cursor {
    /// Creates a caret at an offset with no selection.
    pub fn new(head: usize) -> Self {
        Self { head, anchor: None }
    }

    /// Moves the caret, clearing the selection.
    pub fn move_to(&mut self, head: usize) {
        self.head = head;
        self.anchor = None;
    }

    /// Selects `anchor..head` (in either direction).
    pub fn select(&mut self, anchor: usize, head: usize) {
        self.anchor = Some(anchor);
        self.head = head;
    }

    /// Clears any selection, keeping the caret.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Returns true if a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|a| a != self.head)
    }

    /// Returns the normalized selection range.
    pub fn selection(&self) -> Option<Range<usize>> {
        self.anchor
            .filter(|&a| a != self.head)
            .map(|a| a.min(self.head)..a.max(self.head))
    }

    /// Keeps both ends within a document of `len` characters.
    pub fn clamp(&mut self, len: usize) {
        self.head = self.head.min(len);
        self.anchor = self.anchor.map(|a| a.min(len));
    }
}
