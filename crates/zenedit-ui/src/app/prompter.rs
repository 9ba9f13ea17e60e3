use std::io::Write;
use std::path::PathBuf;

use zenedit_core::{PathPurpose, Prompter, UnsavedChoice};

use crate::app::messages::Inbox;

/// Asks questions on the console and reads the answer from the next input
/// line. An empty answer or closed input cancels.
pub struct ConsolePrompter<'a, W: Write> {
    inbox: &'a mut Inbox,
    out: &'a mut W,
}

impl<'a, W: Write> ConsolePrompter<'a, W> {
    pub fn new(inbox: &'a mut Inbox, out: &'a mut W) -> Self {
        Self { inbox, out }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let shown = write!(self.out, "{question} ").and_then(|()| self.out.flush());
        if let Err(e) = shown {
            tracing::warn!("Failed to show prompt: {}", e);
        }
        let answer = self.inbox.next_line()?;
        let answer = answer.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }
}

impl<W: Write> Prompter for ConsolePrompter<'_, W> {
    fn confirm_unsaved(&mut self, action: &str) -> UnsavedChoice {
        let question = format!("Do you want to save changes before {action}? [y]es/[n]o/[c]ancel:");
        match self.ask(&question).map(|a| a.to_ascii_lowercase()).as_deref() {
            Some("y" | "yes") => UnsavedChoice::Save,
            Some("n" | "no") => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn ask_path(&mut self, purpose: PathPurpose) -> Option<PathBuf> {
        let hint = match purpose {
            PathPurpose::BackgroundImage => " (PNG or GIF)",
            PathPurpose::Open | PathPurpose::Save => "",
        };
        self.ask(&format!("{}{hint} path:", purpose.title()))
            .map(PathBuf::from)
    }

    fn ask_text(&mut self, title: &str, prompt: &str, initial: Option<&str>) -> Option<String> {
        let question = match initial {
            Some(initial) => format!("{title}: {prompt} [{initial}]"),
            None => format!("{title}: {prompt}"),
        };
        // Enter keeps the pre-filled value
        self.ask(&question)
            .or_else(|| initial.map(str::to_string))
    }
}
