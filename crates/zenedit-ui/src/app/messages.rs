use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Everything the message loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // Input
    Input(String),
    InputClosed,

    // Timers
    AutosaveTick,
    BlinkTick,
}

/// The receiving end of the message loop.
///
/// Both the main loop and modal prompts read from here. Once the input
/// side has closed, every read returns `None`.
#[derive(Debug)]
pub struct Inbox {
    rx: UnboundedReceiver<AppEvent>,
    closed: bool,
}

impl Inbox {
    pub fn channel() -> (UnboundedSender<AppEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx, closed: false })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Blocks for the next event. `None` once input has closed.
    ///
    /// Must not be called from inside the tokio runtime.
    pub fn recv(&mut self) -> Option<AppEvent> {
        if self.closed {
            return None;
        }
        match self.rx.blocking_recv() {
            Some(AppEvent::InputClosed) | None => {
                self.closed = true;
                None
            }
            event => event,
        }
    }

    /// Blocks for the next input line, dropping timer ticks on the way.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(event) = self.recv() {
            match event {
                AppEvent::Input(line) => return Some(line),
                tick => tracing::debug!("Dropping {:?} while waiting for input", tick),
            }
        }
        None
    }
}
