//! Modal questions the editor asks the user.
//!
//! The editor never talks to a terminal or window directly. Operations that
//! need an answer take a `&mut dyn Prompter`, and each frontend supplies
//! its own.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Answer to "you have unsaved changes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Why a path is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Open,
    Save,
    BackgroundImage,
}

impl PathPurpose {
    pub fn title(self) -> &'static str {
        match self {
            PathPurpose::Open => "Open File",
            PathPurpose::Save => "Save As",
            PathPurpose::BackgroundImage => "Background Image",
        }
    }
}

/// Source of answers to modal questions.
///
/// `None` always means the user cancelled.
pub trait Prompter {
    /// Three-way question before `action` discards changes.
    fn confirm_unsaved(&mut self, action: &str) -> UnsavedChoice;

    fn ask_path(&mut self, purpose: PathPurpose) -> Option<PathBuf>;

    /// Free-form text, optionally pre-filled.
    fn ask_text(&mut self, title: &str, prompt: &str, initial: Option<&str>) -> Option<String>;
}

/// One canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(UnsavedChoice),
    Path(Option<PathBuf>),
    Text(Option<String>),
}

/// A prompter that replays canned answers, for tests and scripted runs.
///
/// Running out of answers, or meeting an answer of the wrong kind, reads
/// as a cancel.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Titles of the questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm_unsaved(&mut self, action: &str) -> UnsavedChoice {
        self.asked.push(format!("unsaved: {action}"));
        match self.answers.pop_front() {
            Some(Answer::Choice(choice)) => choice,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn ask_path(&mut self, purpose: PathPurpose) -> Option<PathBuf> {
        self.asked.push(purpose.title().to_string());
        match self.answers.pop_front() {
            Some(Answer::Path(path)) => path,
            _ => None,
        }
    }

    fn ask_text(&mut self, title: &str, _prompt: &str, _initial: Option<&str>) -> Option<String> {
        self.asked.push(title.to_string());
        match self.answers.pop_front() {
            Some(Answer::Text(text)) => text,
            _ => None,
        }
    }
}

/// Parses a number typed by the user.
pub fn parse_number<T: FromStr>(what: &str, input: &str) -> CoreResult<T> {
    input
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid(format!("{what} must be a number, got {:?}", input.trim())))
}

/// Parses a `<width>x<height>` size; both parts must be positive.
pub fn parse_size(input: &str) -> CoreResult<(u32, u32)> {
    let invalid = || CoreError::invalid(format!("expected <width>x<height>, got {:?}", input.trim()));
    let (w, h) = input
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(CoreError::invalid("width and height must be positive"));
    }
    Ok((width, height))
}
