//! Settings store: the persisted appearance and behavior options.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML mapping.
//! `#[serde(default)]` fills every missing field from `Default`, so old or
//! hand-trimmed files keep working. `#[serde(flatten)]` collects keys we
//! don't know into `extra`, and they are written back untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::persist::write_atomic;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Returns the ZenEdit directory inside the platform config directory.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join("zenedit"))
        .ok_or(SettingsError::NoConfigDir)
}

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| format!("expected a #rrggbb color, got {s:?}"))?;
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Persisted editor settings.
///
/// Field names are the on-disk keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window background behind the text area
    pub root_bg_color: Color,
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    pub font_bold: bool,
    pub font_italic: bool,
    /// Text area background
    pub bg_color: Color,
    /// Text color
    pub fg_color: Color,
    pub caret_cursor_color: Color,
    pub selection_color: Color,
    pub selection_text_color: Color,
    /// Block-style caret
    pub caret_cursor: bool,
    /// Text area width in pixels
    pub text_width: u32,
    /// Text area height in pixels
    pub text_height: u32,
    /// Extra space below each line, in pixels
    pub line_spacing: f64,
    pub border_thickness: u32,
    pub border_color: Color,
    pub padding: u32,
    /// Caret thickness in pixels
    pub insertwidth: u32,
    pub auto_save_enabled: bool,
    pub auto_save_interval_ms: u64,

    /// Keys this version doesn't know about, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let dark = Color::rgb(0x1e, 0x1e, 0x1e);
        Self {
            root_bg_color: dark,
            font_family: "Arial".to_string(),
            font_size: 16,
            font_bold: false,
            font_italic: false,
            bg_color: dark,
            fg_color: Color::WHITE,
            caret_cursor_color: Color::WHITE,
            selection_color: Color::rgb(0x33, 0x99, 0xff),
            selection_text_color: Color::WHITE,
            caret_cursor: false,
            text_width: 800,
            text_height: 945,
            line_spacing: 4.0,
            border_thickness: 1,
            border_color: Color::WHITE,
            padding: 0,
            insertwidth: 2,
            auto_save_enabled: true,
            auto_save_interval_ms: 5000,
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Parses and validates a settings document.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let settings: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the range constraints serde can't express.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("font_size", u64::from(self.font_size)),
            ("text_width", u64::from(self.text_width)),
            ("text_height", u64::from(self.text_height)),
            ("insertwidth", u64::from(self.insertwidth)),
            ("auto_save_interval_ms", self.auto_save_interval_ms),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(format!("{key} must be positive"));
        }
        if !(self.line_spacing.is_finite() && self.line_spacing > 0.0) {
            return Err("line_spacing must be a positive number".to_string());
        }
        Ok(())
    }

    /// Sets one key from its textual form.
    ///
    /// Unknown keys are stored in `extra` verbatim as strings. On error
    /// nothing changes.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidValue {
            key: key.to_string(),
            reason,
        };
        let mut next = self.clone();
        let value = value.trim();

        match key {
            "font_family" => {
                if value.is_empty() {
                    return Err(invalid("font family can't be empty".to_string()));
                }
                next.font_family = value.to_string();
            }
            "font_size" => next.font_size = parse_scalar(value).map_err(invalid)?,
            "font_bold" => next.font_bold = parse_bool(value).map_err(invalid)?,
            "font_italic" => next.font_italic = parse_bool(value).map_err(invalid)?,
            "caret_cursor" => next.caret_cursor = parse_bool(value).map_err(invalid)?,
            "text_width" => next.text_width = parse_scalar(value).map_err(invalid)?,
            "text_height" => next.text_height = parse_scalar(value).map_err(invalid)?,
            "line_spacing" => next.line_spacing = parse_scalar(value).map_err(invalid)?,
            "border_thickness" => next.border_thickness = parse_scalar(value).map_err(invalid)?,
            "padding" => next.padding = parse_scalar(value).map_err(invalid)?,
            "insertwidth" => next.insertwidth = parse_scalar(value).map_err(invalid)?,
            "auto_save_enabled" => next.auto_save_enabled = parse_bool(value).map_err(invalid)?,
            "auto_save_interval_ms" => {
                next.auto_save_interval_ms = parse_scalar(value).map_err(invalid)?
            }
            _ => match ColorTarget::from_key(key) {
                Some(target) => *target.slot(&mut next) = value.parse().map_err(invalid)?,
                None => {
                    next.extra
                        .insert(key.to_string(), toml::Value::String(value.to_string()));
                }
            },
        }

        next.validate().map_err(invalid)?;
        *self = next;
        Ok(())
    }

    /// Returns the textual value of a key, known or not.
    pub fn get(&self, key: &str) -> Option<String> {
        let table = toml::Table::try_from(self).ok()?;
        table.get(key).map(|value| match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Returns every key with its textual value, known keys first.
    pub fn entries(&self) -> Vec<(String, String)> {
        let Ok(table) = toml::Table::try_from(self) else {
            return Vec::new();
        };
        table
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect()
    }
}

fn parse_scalar<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("{value:?} is not a valid number: {e}"))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("{value:?} is not a boolean")),
    }
}

/// The color settings a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    RootBackground,
    Background,
    Text,
    Caret,
    Selection,
    SelectionText,
    Border,
}

impl ColorTarget {
    pub const ALL: [ColorTarget; 7] = [
        ColorTarget::RootBackground,
        ColorTarget::Background,
        ColorTarget::Text,
        ColorTarget::Caret,
        ColorTarget::Selection,
        ColorTarget::SelectionText,
        ColorTarget::Border,
    ];

    /// The settings key backing this color.
    pub fn key(self) -> &'static str {
        match self {
            ColorTarget::RootBackground => "root_bg_color",
            ColorTarget::Background => "bg_color",
            ColorTarget::Text => "fg_color",
            ColorTarget::Caret => "caret_cursor_color",
            ColorTarget::Selection => "selection_color",
            ColorTarget::SelectionText => "selection_text_color",
            ColorTarget::Border => "border_color",
        }
    }

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColorTarget::RootBackground => "root",
            ColorTarget::Background => "background",
            ColorTarget::Text => "text",
            ColorTarget::Caret => "caret",
            ColorTarget::Selection => "selection",
            ColorTarget::SelectionText => "selection-text",
            ColorTarget::Border => "border",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Accepts either the short name or the settings key.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s || t.key() == s)
    }

    pub fn get(self, settings: &Settings) -> Color {
        match self {
            ColorTarget::RootBackground => settings.root_bg_color,
            ColorTarget::Background => settings.bg_color,
            ColorTarget::Text => settings.fg_color,
            ColorTarget::Caret => settings.caret_cursor_color,
            ColorTarget::Selection => settings.selection_color,
            ColorTarget::SelectionText => settings.selection_text_color,
            ColorTarget::Border => settings.border_color,
        }
    }

    pub fn slot(self, settings: &mut Settings) -> &mut Color {
        match self {
            ColorTarget::RootBackground => &mut settings.root_bg_color,
            ColorTarget::Background => &mut settings.bg_color,
            ColorTarget::Text => &mut settings.fg_color,
            ColorTarget::Caret => &mut settings.caret_cursor_color,
            ColorTarget::Selection => &mut settings.selection_color,
            ColorTarget::SelectionText => &mut settings.selection_text_color,
            ColorTarget::Border => &mut settings.border_color,
        }
    }
}

/// Loads settings once, then rewrites the whole file on every change.
///
/// There is exactly one store per process and it lives on the UI owner, so
/// there is no locking: the last write wins.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Returns the default settings file path.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        Ok(config_dir()?.join(SETTINGS_FILE_NAME))
    }

    /// Loads settings from `path`.
    ///
    /// A missing file yields the defaults. A file that can't be parsed or
    /// holds out-of-range values is `Corrupt`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(content) => Settings::from_toml(&content).map_err(|reason| SettingsError::Corrupt {
                path: path.clone(),
                reason,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        Ok(Self { path, settings })
    }

    /// Loads settings, falling back to defaults when the file is unusable.
    ///
    /// The error that forced the fallback is returned for the user.
    pub fn load_or_defaults(path: impl Into<PathBuf>) -> (Self, Option<SettingsError>) {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!("Falling back to default settings: {}", e);
                (Self::with_defaults(path), Some(e))
            }
        }
    }

    /// A store holding the defaults, without touching the disk.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets one key from its textual form and persists.
    ///
    /// Invalid values leave everything unchanged. A failed write still
    /// keeps the new value in memory.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.settings.set(key, value)?;
        self.persist()
    }

    /// Applies a typed change and persists.
    pub fn update_with(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        change(&mut self.settings);
        self.persist()
    }

    /// Deletes the file, restores the defaults and writes them back.
    pub fn reset_to_defaults(&mut self) -> Result<&Settings, SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SettingsError::Persistence {
                    path: self.path.clone(),
                    source,
                });
            }
        }
        self.settings = Settings::default();
        self.persist()?;
        Ok(&self.settings)
    }

    /// Writes the whole mapping to disk.
    pub fn persist(&self) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(&self.settings)?;
        write_atomic(&self.path, content.as_bytes()).map_err(|source| {
            SettingsError::Persistence {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save settings to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
