//! Drives the console app through its message channel.

use std::time::Duration;

use tokio::runtime::Runtime;
use zenedit_core::{Editor, EditorPaths};
use zenedit_ui::{App, AppEvent, Renderer};

struct Harness {
    _runtime: Runtime,
    dir: tempfile::TempDir,
    paths: EditorPaths,
    app: App<Vec<u8>>,
    sender: tokio::sync::mpsc::UnboundedSender<AppEvent>,
}

impl Harness {
    fn new() -> Self {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let paths = EditorPaths::in_dir(dir.path());
        let (editor, _) = Editor::start(paths.clone());
        let (app, sender) = App::new(editor, runtime.handle().clone(), Renderer::new(false), Vec::new());
        Self {
            _runtime: runtime,
            dir,
            paths,
            app,
            sender,
        }
    }

    fn send(&self, lines: &[&str]) {
        for line in lines {
            self.sender.send(AppEvent::Input((*line).to_string())).unwrap();
        }
    }

    /// Feeds `lines`, closes input and runs the loop to the end.
    fn run(&mut self, lines: &[&str]) -> String {
        self.send(lines);
        self.sender.send(AppEvent::InputClosed).unwrap();
        self.app.run().unwrap();
        String::from_utf8_lossy(self.app.output()).into_owned()
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }
}

#[test]
fn test_save_asks_for_path() {
    let mut h = Harness::new();
    let target = h.path("notes.txt");
    let output = h.run(&["type hello\\nworld", "save", &target]);

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello\nworld");
    assert!(output.contains("Save As path:"));
    assert!(output.contains("ZenEdit - notes.txt\n"));
    assert!(!h.app.editor.document().is_modified());
}

#[test]
fn test_quit_cancel_then_discard() {
    let mut h = Harness::new();
    let output = h.run(&["type x", "quit", "c", "quit", "n", "type never"]);

    assert!(h.app.editor.should_quit());
    assert_eq!(h.app.editor.document().text(), "x");
    assert!(output.contains("save changes before exiting"));
}

#[test]
fn test_key_binding_runs_command() {
    let mut h = Harness::new();
    let output = h.run(&["type one two three", "key ctrl+shift+g", "key ctrl+k"]);

    assert!(output.contains("[Word/Character Count] Words: 3\nCharacters: 13"));
    assert!(output.contains("No binding for Ctrl+K"));
}

#[test]
fn test_errors_are_reported_and_loop_continues() {
    let mut h = Harness::new();
    let output = h.run(&["frobnicate", "fontsize abc", "open /definitely/missing.txt", "type ok"]);

    assert!(output.contains("Error: Command not found: frobnicate"));
    assert!(output.contains("Error: Invalid input"));
    assert!(output.contains("Error: File not found"));
    assert_eq!(h.app.editor.document().text(), "ok");
}

#[test]
fn test_ticks_during_prompt_are_dropped() {
    let mut h = Harness::new();
    h.send(&["type a\\nb\\nc", "goto"]);
    h.sender.send(AppEvent::AutosaveTick).unwrap();
    h.sender.send(AppEvent::BlinkTick).unwrap();
    h.run(&["2"]);

    assert_eq!(h.app.editor.document().selected_text().as_deref(), Some("b"));
}

#[test]
fn test_autosave_tick_writes_fallback_file() {
    let mut h = Harness::new();
    h.send(&["type draft"]);
    h.sender.send(AppEvent::AutosaveTick).unwrap();
    h.run(&[]);

    assert_eq!(std::fs::read_to_string(&h.paths.autosave_file).unwrap(), "draft");
    assert!(h.app.editor.document().is_modified());
}

#[test]
fn test_timers_follow_settings() {
    let mut h = Harness::new();
    assert_eq!(h.app.autosave_period(), Some(Duration::from_millis(5000)));

    h.app.update(AppEvent::Input("autosaveinterval 250".into())).unwrap();
    assert_eq!(h.app.autosave_period(), Some(Duration::from_millis(250)));

    h.app.update(AppEvent::Input("autosave".into())).unwrap();
    assert_eq!(h.app.autosave_period(), None);

    h.app.update(AppEvent::Input("blink 50".into())).unwrap();
    assert_eq!(h.app.blink_period(), Some(Duration::from_millis(50)));

    h.app.update(AppEvent::Input("blink".into())).unwrap();
    assert_eq!(h.app.blink_period(), None);
}

#[test]
fn test_settings_commands() {
    let mut h = Harness::new();
    let output = h.run(&["set font_size 20", "get font_size", "color text #00ff00", "get fg_color"]);

    assert!(output.contains("font_size = 20"));
    assert!(output.contains("fg_color = #00ff00"));
    let saved = std::fs::read_to_string(&h.paths.settings_file).unwrap();
    assert!(saved.contains("font_size = 20"));
}

#[test]
fn test_help_lists_commands_and_bindings() {
    let mut h = Harness::new();
    let output = h.run(&["help"]);

    assert!(output.contains("replace [-c] [query [replacement]]"));
    assert!(output.contains("Ctrl+Alt+S"));
    assert!(output.contains("F11"));
}
