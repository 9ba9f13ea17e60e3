//! Keyboard mapping.
//!
//! ## Learning: Lookup Tables
//!
//! Every binding is a single chord, so the keymap is a plain
//! `HashMap<KeyPress, Command>`. There is no pending state: a chord either
//! maps to a command or it doesn't.
//!
//! Letter keys are stored lowercase, so `Ctrl+S` and `Ctrl+s` are the same
//! chord. Shift is still significant as a modifier.

use std::collections::HashMap;
use std::fmt;

use crate::command::Command;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
    };

    /// Ctrl+Alt.
    pub const CTRL_ALT: Modifiers = Modifiers {
        ctrl: true,
        alt: true,
        shift: false,
    };

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: true,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }

    /// Parses modifiers from a string like "ctrl+shift".
    pub fn parse(s: &str) -> Self {
        let mut mods = Modifiers::NONE;
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" | "option" => mods.alt = true,
                "shift" => mods.shift = true,
                _ => {}
            }
        }
        mods
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Escape,
    F(u8), // F1-F12
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "escape" | "esc" => Some(Key::Escape),
            "space" => Some(Key::Char(' ')),
            _ if lower.starts_with('f') && (2..=3).contains(&lower.len()) => lower[1..]
                .parse()
                .ok()
                .filter(|n| (1..=12).contains(n))
                .map(Key::F),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_lowercase().next().unwrap_or(c)),
            other => other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Escape => write!(f, "Escape"),
            Key::F(n) => write!(f, "F{}", n),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press. Letters are folded to lowercase.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key: key.normalized(),
            modifiers,
        }
    }

    /// Parses a key binding string like "ctrl+s" or "F11".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        // "ctrl++" binds the plus key itself
        let (mods, key) = match s.strip_suffix("++") {
            Some(mods) => (mods, "+"),
            None => s.rsplit_once('+').unwrap_or(("", s)),
        };
        Some(Self::new(Key::parse(key)?, Modifiers::parse(mods)))
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// Fixed chord-to-command table.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyPress, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    fn add_default_bindings(&mut self) {
        use crate::command::Command::*;

        let ctrl = |c| KeyPress::new(Key::Char(c), Modifiers::CTRL);

        // File
        self.bind(ctrl('n'), NewFile);
        self.bind(ctrl('o'), OpenFile { path: None });
        self.bind(ctrl('s'), Save { path: None });
        self.bind(KeyPress::new(Key::Char('s'), Modifiers::CTRL_ALT), SaveAs { path: None });
        self.bind(ctrl('q'), Quit);

        // Edit
        self.bind(ctrl('z'), Undo);
        self.bind(ctrl('y'), Redo);
        self.bind(ctrl('c'), Copy);
        self.bind(ctrl('x'), Cut);
        self.bind(ctrl('v'), Paste);
        self.bind(ctrl('a'), SelectAll);

        // Search
        let find = Find {
            query: None,
            case_sensitive: false,
        };
        self.bind(ctrl('f'), find.clone());
        self.bind(KeyPress::new(Key::F(3), Modifiers::NONE), find);
        self.bind(
            ctrl('h'),
            Replace {
                query: None,
                replacement: None,
                case_sensitive: false,
            },
        );
        self.bind(ctrl('g'), GotoLine { line: None });

        // View
        self.bind(KeyPress::new(Key::F(5), Modifiers::NONE), ToggleLineNumbers);
        self.bind(KeyPress::new(Key::Char('g'), Modifiers::CTRL_SHIFT), WordCount);
        self.bind(KeyPress::new(Key::F(2), Modifiers::NONE), ToggleBorder);
        self.bind(KeyPress::new(Key::F(10), Modifiers::NONE), ToggleMenu);
        self.bind(KeyPress::new(Key::F(11), Modifiers::NONE), ToggleFullscreen);
    }

    fn bind(&mut self, key: KeyPress, command: Command) {
        self.bindings.insert(key, command);
    }

    /// The command bound to `key`, if any.
    pub fn lookup(&self, key: &KeyPress) -> Option<&Command> {
        self.bindings.get(&KeyPress::new(key.key, key.modifiers))
    }

    /// All bindings, sorted by their display form.
    pub fn bindings(&self) -> Vec<(KeyPress, &Command)> {
        let mut all: Vec<_> = self.bindings.iter().map(|(k, c)| (*k, c)).collect();
        all.sort_by_key(|(k, _)| k.to_string());
        all
    }
}
