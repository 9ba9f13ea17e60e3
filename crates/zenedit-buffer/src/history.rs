//! Undo/redo history management.
//!
//! ## Learning: The Command Pattern
//!
//! Each edit is stored as a record that can be:
//! - Undone (its inverse applied)
//! - Redone (re-applied after undo)
//!
//! Edits are collected in groups. A group is one undo step: rapid
//! keystrokes coalesce into one group, and compound operations such as
//! "replace all" open an explicit group so they undo in one go.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation.
///
/// ## Learning: Clone vs Copy
///
/// `Edit` implements `Clone` but not `Copy` because it contains
/// a `String`, which owns heap memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character position where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Returns the inverse of this edit (for undo).
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Number of characters this edit covers.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if this edit can be coalesced with another.
    ///
    /// Two edits can be coalesced if:
    /// - They're the same kind
    /// - They're adjacent (next character for insert, same position for delete)
    /// - Neither contains a newline
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }

        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => self.position + self.char_len() == other.position,
            EditKind::Delete => {
                // Backspace lands just before us, forward delete at the same spot
                other.position + other.char_len() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Coalesces another edit into this one.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => {
                self.content.push_str(&other.content);
            }
            EditKind::Delete => {
                if other.position < self.position {
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// A group of edits that are undone/redone together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// The edits in application order
    pub edits: Vec<Edit>,
    /// Last time the group grew; `None` disables coalescing
    pub timestamp: Option<Instant>,
}

impl EditGroup {
    /// Creates a new edit group.
    pub fn new(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            timestamp: Some(Instant::now()),
        }
    }

    /// Creates a group that will never absorb later keystrokes.
    fn sealed(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            timestamp: None,
        }
    }
}

/// Manages undo/redo history.
///
/// ## Learning: VecDeque
///
/// We use `VecDeque` instead of `Vec` for the undo stack because we need
/// to push to the back (new edits), pop from the back (undo) and drop from
/// the front once the configured depth is exceeded.
#[derive(Debug, Clone)]
pub struct History {
    /// Stack of undoable edit groups
    undo_stack: VecDeque<EditGroup>,
    /// Stack of redoable edit groups
    redo_stack: Vec<EditGroup>,
    /// Maximum number of edit groups to keep
    max_size: usize,
    /// Time threshold for coalescing edits
    coalesce_threshold: Duration,
    /// Inside `begin_group`/`end_group`
    in_group: bool,
    /// The explicit group already has its first edit
    group_started: bool,
}

impl History {
    /// Creates a new history with the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(64)),
            redo_stack: Vec::new(),
            max_size,
            coalesce_threshold: Duration::from_millis(300),
            in_group: false,
            group_started: false,
        }
    }

    /// Pushes an edit onto the history.
    ///
    /// Clears the redo stack (no branching history). Outside an explicit
    /// group the edit may coalesce with the previous one.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if self.in_group {
            match self.undo_stack.back_mut() {
                Some(group) if self.group_started => group.edits.push(edit),
                _ => {
                    self.undo_stack.push_back(EditGroup::sealed(edit));
                    self.group_started = true;
                }
            }
            self.enforce_capacity();
            return;
        }

        if let Some(last_group) = self.undo_stack.back_mut() {
            let recent = last_group
                .timestamp
                .is_some_and(|t| t.elapsed() < self.coalesce_threshold);

            if recent && last_group.edits.len() == 1 {
                if let Some(last_edit) = last_group.edits.last_mut() {
                    if last_edit.can_coalesce(&edit) {
                        last_edit.coalesce(edit);
                        last_group.timestamp = Some(Instant::now());
                        return;
                    }
                }
            }
        }

        self.undo_stack.push_back(EditGroup::new(edit));
        self.enforce_capacity();
    }

    fn enforce_capacity(&mut self) {
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Starts an edit group.
    ///
    /// All edits until `end_group()` will be treated as one undo step.
    pub fn begin_group(&mut self) {
        self.in_group = true;
        self.group_started = false;
    }

    /// Ends the current edit group.
    pub fn end_group(&mut self) {
        self.in_group = false;
        self.group_started = false;
    }

    /// Pops the last edit group for undoing.
    ///
    /// The returned edits are in application order; the caller reverts them
    /// back to front.
    pub fn undo(&mut self) -> Option<Vec<Edit>> {
        let group = self.undo_stack.pop_back()?;
        let edits = group.edits.clone();
        self.redo_stack.push(group);
        Some(edits)
    }

    /// Pops the last undone group for redoing, in application order.
    pub fn redo(&mut self) -> Option<Vec<Edit>> {
        let mut group = self.redo_stack.pop()?;
        let edits = group.edits.clone();
        // Redone groups never absorb new keystrokes
        group.timestamp = None;
        self.undo_stack.push_back(group);
        Some(edits)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.in_group = false;
        self.group_started = false;
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_inverse() {
        let insert = Edit::insert(0, "hello");
        let inverse = insert.inverse();

        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.position, 0);
        assert_eq!(inverse.content, "hello");
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new(100);

        history.push(Edit::insert(0, "a"));
        std::thread::sleep(Duration::from_millis(400)); // Prevent coalescing
        history.push(Edit::insert(1, "b"));

        assert!(history.can_undo());
        let edits = history.undo().unwrap();
        assert_eq!(edits, vec![Edit::insert(1, "b")]);

        assert!(history.can_redo());
        let edits = history.redo().unwrap();
        assert_eq!(edits[0].content, "b");
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_edit_coalescing() {
        let mut e1 = Edit::insert(0, "a");
        let e2 = Edit::insert(1, "b");

        assert!(e1.can_coalesce(&e2));
        e1.coalesce(e2);
        assert_eq!(e1.content, "ab");
    }

    #[test]
    fn test_explicit_group_is_one_step() {
        let mut history = History::new(100);
        history.push(Edit::insert(0, "x"));

        history.begin_group();
        history.push(Edit::delete(0, "x"));
        history.push(Edit::insert(0, "yz"));
        history.end_group();

        assert_eq!(history.undo_count(), 2);
        let edits = history.undo().unwrap();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].kind, EditKind::Delete);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new(100);
        history.push(Edit::insert(0, "a\n"));
        history.undo();
        assert!(history.can_redo());

        history.push(Edit::insert(0, "b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(2);
        for i in 0..4 {
            history.push(Edit::insert(i * 2, "x\n"));
        }
        assert_eq!(history.undo_count(), 2);
    }
}
