use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::UnboundedSender;
use zenedit_core::{
    CommandRegistry, Editor, EditorPaths, EventHandler, Keymap, ScheduledTask,
};

use crate::render::Renderer;

pub mod messages;
pub mod prompter;
pub mod update;

pub use messages::{AppEvent, Inbox};
pub use prompter::ConsolePrompter;

/// Launch options.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// File to open at startup
    pub file: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub autosave_file: Option<PathBuf>,
}

/// The console application: owns the editor and the timers feeding it.
pub struct App<W: Write> {
    pub editor: Editor,
    keymap: Keymap,
    registry: CommandRegistry,
    events: EventHandler,
    inbox: Inbox,
    sender: UnboundedSender<AppEvent>,
    runtime: Handle,
    autosave: Option<ScheduledTask>,
    blink: Option<ScheduledTask>,
    renderer: Renderer,
    out: W,
}

impl<W: Write> App<W> {
    /// Wraps `editor`. Input is sent through the returned sender.
    pub fn new(editor: Editor, runtime: Handle, renderer: Renderer, out: W) -> (Self, UnboundedSender<AppEvent>) {
        let (sender, inbox) = Inbox::channel();
        let events = EventHandler::new(editor.subscribe());
        let mut app = Self {
            editor,
            keymap: Keymap::new(),
            registry: CommandRegistry::new(),
            events,
            inbox,
            sender: sender.clone(),
            runtime,
            autosave: None,
            blink: None,
            renderer,
            out,
        };
        app.sync_timers();
        (app, sender)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs until the editor quits or input closes.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.render()?;
        writeln!(self.out, "Type `help` for commands.")?;
        while let Some(event) = self.inbox.recv() {
            self.update(event)?;
            if self.editor.should_quit() {
                tracing::info!("Exiting");
                return Ok(());
            }
        }
        self.on_input_closed();
        Ok(())
    }

    /// Last-chance snapshot when stdin ends without a quit.
    fn on_input_closed(&mut self) {
        tracing::info!("Input closed");
        if self.editor.document().is_modified() {
            match self.editor.autosave() {
                Ok(Some(path)) => tracing::info!("Unsaved text kept in {}", path.display()),
                Ok(None) => tracing::warn!("Input closed with unsaved changes"),
                Err(e) => tracing::warn!("Final autosave failed: {}", e),
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.render(&mut self.out, &self.editor)
    }

    /// Starts, restarts or stops the timers to match the editor.
    fn sync_timers(&mut self) {
        let autosave = self.editor.auto_save_interval();
        if autosave != self.autosave.as_ref().map(ScheduledTask::period) {
            tracing::debug!("Autosave timer: {:?}", autosave);
            self.autosave = autosave.map(|period| self.schedule(period, AppEvent::AutosaveTick));
        }

        let blink = self.editor.text_blink_period();
        if blink != self.blink.as_ref().map(ScheduledTask::period) {
            tracing::debug!("Blink timer: {:?}", blink);
            self.blink = blink.map(|period| self.schedule(period, AppEvent::BlinkTick));
        }
    }

    fn schedule(&self, period: Duration, event: AppEvent) -> ScheduledTask {
        let sender = self.sender.clone();
        ScheduledTask::repeating(&self.runtime, period, move || sender.send(event.clone()).is_ok())
    }

    /// Whether an autosave timer is running, and at what period.
    pub fn autosave_period(&self) -> Option<Duration> {
        self.autosave.as_ref().map(ScheduledTask::period)
    }

    pub fn blink_period(&self) -> Option<Duration> {
        self.blink.as_ref().map(ScheduledTask::period)
    }
}

/// Forwards stdin lines into the message loop from a plain thread.
fn spawn_input_reader(sender: UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
        let _ = sender.send(AppEvent::InputClosed);
    });
}

/// Starts the editor on the console.
pub fn run(flags: Flags) -> anyhow::Result<()> {
    let runtime = Runtime::new()?;
    let paths = EditorPaths::resolve(flags.settings_file, flags.autosave_file)?;
    let (mut editor, settings_error) = Editor::start(paths);

    let mut stdout = io::stdout();
    if let Some(e) = settings_error {
        writeln!(stdout, "Warning: {e}. Using default settings.")?;
    }
    if let Some(file) = flags.file {
        if let Err(e) = editor.open_document(&file) {
            writeln!(stdout, "Error: {e}")?;
        }
    }

    let renderer = Renderer::new(stdout.is_terminal());
    let (mut app, sender) = App::new(editor, runtime.handle().clone(), renderer, stdout);
    spawn_input_reader(sender);
    app.run()
}
