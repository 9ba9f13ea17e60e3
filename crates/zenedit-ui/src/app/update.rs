use std::io::Write;

use zenedit_core::command::NAMES;
use zenedit_core::{Command, EditorEvent, Feedback, KeyPress};

use super::{App, AppEvent, ConsolePrompter};

impl<W: Write> App<W> {
    /// Handles one message, then redraws if anything visible changed.
    pub fn update(&mut self, event: AppEvent) -> anyhow::Result<()> {
        match event {
            AppEvent::Input(line) => self.handle_line(&line)?,
            AppEvent::AutosaveTick => match self.editor.autosave() {
                Ok(Some(path)) => tracing::debug!("Autosaved to {}", path.display()),
                Ok(None) => {}
                Err(e) => tracing::warn!("Autosave failed: {}", e),
            },
            AppEvent::BlinkTick => {
                if !self.editor.blink_tick() {
                    self.blink = None;
                }
            }
            AppEvent::InputClosed => {}
        }

        self.sync_timers();
        if self.needs_redraw() {
            self.render()?;
        }
        Ok(())
    }

    /// Drains pending editor events; true if any of them changes the picture.
    fn needs_redraw(&mut self) -> bool {
        let mut redraw = false;
        for event in self.events.drain() {
            match event {
                EditorEvent::Autosaved(_) | EditorEvent::Quit => {}
                _ => redraw = true,
            }
        }
        redraw && !self.editor.should_quit()
    }

    fn handle_line(&mut self, line: &str) -> anyhow::Result<()> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word {
            "" => {}
            "help" => self.print_help()?,
            "print" => self.render()?,
            "settings" => {
                for (key, value) in self.editor.settings().entries() {
                    writeln!(self.out, "{key} = {value}")?;
                }
            }
            "get" => match self.editor.settings().get(rest) {
                Some(value) => writeln!(self.out, "{rest} = {value}")?,
                None => writeln!(self.out, "Error: unknown setting {rest:?}")?,
            },
            "key" => match KeyPress::parse(rest) {
                Some(key) => match self.keymap.lookup(&key).cloned() {
                    Some(cmd) => self.execute(&cmd)?,
                    None => writeln!(self.out, "No binding for {key}")?,
                },
                None => writeln!(self.out, "Error: can't read key {rest:?}")?,
            },
            _ => match Command::parse(line) {
                Ok(cmd) => self.execute(&cmd)?,
                Err(e) => writeln!(self.out, "Error: {e}")?,
            },
        }
        Ok(())
    }

    fn execute(&mut self, cmd: &Command) -> anyhow::Result<()> {
        let mut prompter = ConsolePrompter::new(&mut self.inbox, &mut self.out);
        let result = self.registry.execute(cmd, &mut self.editor, &mut prompter);
        match result {
            Ok(Feedback::None) => {}
            Ok(Feedback::Info { title, message }) => {
                writeln!(self.out, "[{title}] {message}")?;
            }
            Err(e) => {
                tracing::debug!("{} failed: {}", cmd.display_name(), e);
                writeln!(self.out, "Error: {e}")?;
            }
        }
        Ok(())
    }

    fn print_help(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Commands:")?;
        for (name, args, about) in NAMES {
            let usage = format!("{name} {args}");
            writeln!(self.out, "  {usage:<40} {about}")?;
        }
        writeln!(self.out, "  {:<40} {}", "key <chord>", "run a key binding")?;
        writeln!(self.out, "  {:<40} {}", "get <key> / settings", "show settings")?;
        writeln!(self.out, "  {:<40} {}", "print", "redraw the document")?;
        writeln!(self.out, "Key bindings:")?;
        for (key, cmd) in self.keymap.bindings() {
            writeln!(self.out, "  {:<16} {}", key.to_string(), cmd.display_name())?;
        }
        Ok(())
    }
}
