//! Session-only view state and the resolved surface style.
//!
//! Nothing here is persisted. Toggles reset when the editor restarts.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::{Color, Settings};

/// Caret on-time used when blinking is switched back on.
pub const CARET_BLINK_ON_MS: u64 = 600;
/// Caret off-time used when blinking is switched back on.
pub const CARET_BLINK_OFF_MS: u64 = 300;
/// Text blink period offered when none is given.
pub const DEFAULT_TEXT_BLINK_MS: u64 = 500;

/// Horizontal alignment of a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// An alignment applied to a character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSpan {
    pub alignment: Alignment,
    pub range: Range<usize>,
}

/// Caret blink timing. Zero on-time means a steady caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretBlink {
    pub on_ms: u64,
    pub off_ms: u64,
}

impl CaretBlink {
    pub const STEADY: CaretBlink = CaretBlink { on_ms: 0, off_ms: 0 };

    pub fn is_blinking(&self) -> bool {
        self.off_ms > 0
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self {
            on_ms: CARET_BLINK_ON_MS,
            off_ms: CARET_BLINK_OFF_MS,
        }
    }
}

/// Blinking text: the text color alternates with the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBlink {
    pub period: Duration,
    /// Whether the text is currently drawn in the background color
    pub hidden: bool,
}

/// Ephemeral surface toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub fullscreen: bool,
    pub menu_visible: bool,
    pub border_visible: bool,
    pub caret_visible: bool,
    pub caret_blink: CaretBlink,
    pub mouse_cursor_visible: bool,
    pub text_blink: Option<TextBlink>,
    pub background_image: Option<PathBuf>,
    pub alignment: Option<AlignedSpan>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            fullscreen: false,
            menu_visible: true,
            border_visible: true,
            caret_visible: true,
            caret_blink: CaretBlink::default(),
            mouse_cursor_visible: true,
            text_blink: None,
            background_image: None,
            alignment: None,
        }
    }
}

impl ViewState {
    /// Flips fullscreen. Entering hides the menu, leaving shows it again.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.menu_visible = !self.fullscreen;
    }

    /// Flips the menu. Ignored while fullscreen; returns whether it applied.
    pub fn toggle_menu(&mut self) -> bool {
        if self.fullscreen {
            return false;
        }
        self.menu_visible = !self.menu_visible;
        true
    }

    pub fn toggle_caret_blink(&mut self) {
        self.caret_blink = if self.caret_blink.is_blinking() {
            CaretBlink::STEADY
        } else {
            CaretBlink::default()
        };
    }

    /// Sets both caret on and off times; zero stops blinking.
    pub fn set_caret_blink_speed(&mut self, ms: u64) {
        self.caret_blink = CaretBlink { on_ms: ms, off_ms: ms };
    }

    /// Advances the text blink phase. Returns false if blinking is off.
    pub fn blink_tick(&mut self) -> bool {
        match self.text_blink.as_mut() {
            Some(blink) => {
                blink.hidden = !blink.hidden;
                true
            }
            None => false,
        }
    }
}

/// Font description for the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.size)?;
        if self.bold {
            f.write_str(" bold")?;
        }
        if self.italic {
            f.write_str(" italic")?;
        }
        Ok(())
    }
}

/// Everything a frontend needs to draw the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStyle {
    pub font: FontSpec,
    pub root_background: Color,
    pub background: Color,
    /// Text color after the blink phase is applied
    pub text: Color,
    pub caret: Color,
    pub selection: Color,
    pub selection_text: Color,
    pub border_color: Color,
    /// Zero while the border is hidden
    pub border_thickness: u32,
    /// Zero while the caret is hidden
    pub caret_width: u32,
    pub block_caret: bool,
    pub caret_blink: CaretBlink,
    pub padding: u32,
    pub line_spacing: f64,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub show_menu: bool,
    pub mouse_cursor_visible: bool,
    pub background_image: Option<PathBuf>,
    pub alignment: Option<AlignedSpan>,
}

impl SurfaceStyle {
    pub fn resolve(settings: &Settings, view: &ViewState) -> Self {
        let hidden = view.text_blink.is_some_and(|b| b.hidden);
        Self {
            font: FontSpec {
                family: settings.font_family.clone(),
                size: settings.font_size,
                bold: settings.font_bold,
                italic: settings.font_italic,
            },
            root_background: settings.root_bg_color,
            background: settings.bg_color,
            text: if hidden {
                settings.bg_color
            } else {
                settings.fg_color
            },
            caret: settings.caret_cursor_color,
            selection: settings.selection_color,
            selection_text: settings.selection_text_color,
            border_color: settings.border_color,
            border_thickness: if view.border_visible {
                settings.border_thickness
            } else {
                0
            },
            caret_width: if view.caret_visible {
                settings.insertwidth
            } else {
                0
            },
            block_caret: settings.caret_cursor,
            caret_blink: view.caret_blink,
            padding: settings.padding,
            line_spacing: settings.line_spacing,
            width: settings.text_width,
            height: settings.text_height,
            fullscreen: view.fullscreen,
            show_menu: view.menu_visible && !view.fullscreen,
            mouse_cursor_visible: view.mouse_cursor_visible,
            background_image: view.background_image.clone(),
            alignment: view.alignment.clone(),
        }
    }
}
