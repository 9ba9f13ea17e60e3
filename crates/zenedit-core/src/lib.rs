//! # ZenEdit Core
//!
//! Editor logic and state management.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Editor                           │
//! │  ┌───────────────┐ ┌────────────┐ ┌────────────────────┐ │
//! │  │ SettingsStore │ │ ViewState  │ │   SearchSession    │ │
//! │  └───────────────┘ └────────────┘ └────────────────────┘ │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │              Document (TextBuffer)                 │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//!        ▲ Command (dispatch table)        │ EditorEvent
//!        │                                 ▼
//!    Keymap / UI input                 EventBus → surface
//! ```
//!
//! The `Editor` is the single owner of all mutable state. Timers
//! (`ScheduledTask`) never touch it directly; they post messages that the
//! owner handles in order.

pub mod command;
pub mod document;
pub mod editor;
pub mod event;
pub mod keymap;
mod persist;
pub mod prompt;
pub mod schedule;
pub mod search;
pub mod settings;
pub mod view;

pub use command::{Command, CommandRegistry, Feedback};
pub use document::{Document, DocumentState};
pub use editor::{Editor, EditorPaths};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use keymap::{Key, KeyPress, Keymap, Modifiers};
pub use prompt::{Answer, PathPurpose, Prompter, ScriptedPrompter, UnsavedChoice};
pub use schedule::ScheduledTask;
pub use search::{SearchOutcome, SearchSession};
pub use settings::{Color, ColorTarget, Settings, SettingsError, SettingsStore};
pub use view::{AlignedSpan, Alignment, CaretBlink, FontSpec, SurfaceStyle, TextBlink, ViewState};

use std::path::PathBuf;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
///
/// None of these is fatal: the dispatcher hands them back to the surface,
/// which shows them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Buffer error: {0}")]
    Buffer(#[from] zenedit_buffer::BufferError),

    #[error("Command not found: {0}")]
    CommandNotFound(String),
}

impl CoreError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Like [`CoreError::io`], but a missing file becomes `NotFound`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::io(path, source)
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
