//! Command system for editor actions.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values:
//! - Menus, key bindings and typed input all produce the same `Command`
//! - The dispatch table is one `match`, checked for exhaustiveness
//!
//! Arguments are optional wherever the editor can ask for them instead.
//! A missing argument becomes a prompt at execution time, and a cancelled
//! prompt makes the command a no-op.

use std::path::PathBuf;

use crate::editor::{ABOUT, Editor};
use crate::prompt::{self, PathPurpose, Prompter};
use crate::search::SearchOutcome;
use crate::settings::{Color, ColorTarget};
use crate::view::{Alignment, DEFAULT_TEXT_BLINK_MS};
use crate::{CoreError, CoreResult};

/// Editor commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // File commands
    NewFile,
    OpenFile { path: Option<PathBuf> },
    Save { path: Option<PathBuf> },
    SaveAs { path: Option<PathBuf> },
    Quit,

    // Edit commands
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    InsertText(String),
    MoveCaret(usize),
    Find { query: Option<String>, case_sensitive: bool },
    FindNext,
    CloseSearch,
    Replace {
        query: Option<String>,
        replacement: Option<String>,
        case_sensitive: bool,
    },
    GotoLine { line: Option<usize> },

    // View
    ToggleLineNumbers,
    WordCount,
    ToggleFullscreen,
    ToggleMenu,
    ToggleBorder,
    ToggleMouseCursor,
    ToggleCaret,
    ToggleCaretBlink,
    CaretBlinkSpeed { ms: Option<u64> },

    // Format
    ChangeFont { family: Option<String>, size: Option<u32>, bold: bool, italic: bool },
    FontSize { size: Option<u32> },
    LineSpacing { spacing: Option<f64> },
    Padding { padding: Option<u32> },
    BorderThickness { thickness: Option<u32> },
    CaretThickness { width: Option<u32> },
    TextAreaSize { size: Option<(u32, u32)> },
    SetColor { target: ColorTarget, color: Option<Color> },
    Align(Alignment),
    ToggleTextBlink { ms: Option<u64> },

    // Settings
    ToggleBackgroundImage { path: Option<PathBuf> },
    ToggleAutoSave,
    AutoSaveInterval { ms: Option<u64> },
    ResetTheme,
    Set { key: String, value: String },
    About,
}

/// Command words, their argument shapes and what they do.
pub const NAMES: &[(&str, &str, &str)] = &[
    ("new", "", "start an empty document"),
    ("open", "[path]", "open a file"),
    ("save", "[path]", "save the document"),
    ("saveas", "[path]", "save under a new name"),
    ("quit", "", "exit the editor"),
    ("undo", "", "undo the last edit"),
    ("redo", "", "redo the last undone edit"),
    ("cut", "", "cut the selection"),
    ("copy", "", "copy the selection"),
    ("paste", "", "paste the clipboard"),
    ("selectall", "", "select the whole document"),
    ("type", "<text>", "insert text at the caret (\\n, \\t escapes)"),
    ("caret", "<offset>", "move the caret to a character offset"),
    ("find", "[-c] [query]", "search from the top (-c: match case)"),
    ("next", "", "find the next match"),
    ("close", "", "close the search"),
    ("replace", "[-c] [query [replacement]]", "replace every occurrence"),
    ("goto", "[line]", "select a line"),
    ("linenumbers", "", "add or strip line numbers"),
    ("count", "", "count words and characters"),
    ("fullscreen", "", "toggle fullscreen"),
    ("menu", "", "toggle the menu bar"),
    ("border", "", "toggle the text area border"),
    ("mouse", "", "toggle the mouse cursor"),
    ("caretvisible", "", "toggle the caret"),
    ("caretblink", "", "toggle caret blinking"),
    ("caretspeed", "[ms]", "set caret blink speed (0: steady)"),
    ("font", "[family [size] [bold] [italic]]", "change the font"),
    ("fontsize", "[size]", "change the font size"),
    ("spacing", "[n]", "set line spacing"),
    ("padding", "[n]", "set padding"),
    ("borderwidth", "[n]", "set border thickness"),
    ("caretwidth", "[n]", "set caret thickness"),
    ("size", "[WxH]", "set the text area size"),
    ("color", "<target> [#rrggbb]", "set a color (root, background, text, caret, selection, selection-text, border)"),
    ("align", "<left|center|right>", "align the selection or the document"),
    ("blink", "[ms]", "toggle blinking text"),
    ("bgimage", "[path]", "toggle a PNG/GIF background image"),
    ("autosave", "", "toggle autosave"),
    ("autosaveinterval", "[ms]", "set the autosave period"),
    ("reset", "", "restore the default theme"),
    ("set", "<key> <value>", "set any setting"),
    ("about", "", "show version information"),
];

impl Command {
    /// Parses one input line such as `open notes.txt` or `goto 3`.
    pub fn parse(line: &str) -> CoreResult<Command> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let arg = (!rest.is_empty()).then(|| rest.to_string());
        let path = arg.as_ref().map(PathBuf::from);

        let cmd = match word.to_ascii_lowercase().as_str() {
            "new" => Command::NewFile,
            "open" => Command::OpenFile { path },
            "save" => Command::Save { path },
            "saveas" => Command::SaveAs { path },
            "quit" | "exit" => Command::Quit,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "cut" => Command::Cut,
            "copy" => Command::Copy,
            "paste" => Command::Paste,
            "selectall" => Command::SelectAll,
            "type" => Command::InsertText(unescape(rest)),
            "caret" => Command::MoveCaret(prompt::parse_number("caret offset", rest)?),
            "find" => {
                let (case_sensitive, rest) = case_flag(rest);
                Command::Find {
                    query: (!rest.is_empty()).then(|| rest.to_string()),
                    case_sensitive,
                }
            }
            "next" => Command::FindNext,
            "close" => Command::CloseSearch,
            "replace" => {
                let (case_sensitive, rest) = case_flag(rest);
                let (query, replacement) = match rest.split_once(char::is_whitespace) {
                    Some((q, r)) => (Some(q.to_string()), Some(r.trim_start().to_string())),
                    None if rest.is_empty() => (None, None),
                    None => (Some(rest.to_string()), None),
                };
                Command::Replace {
                    query,
                    replacement,
                    case_sensitive,
                }
            }
            "goto" => Command::GotoLine {
                line: optional(rest, |s| prompt::parse_number("line", s))?,
            },
            "linenumbers" => Command::ToggleLineNumbers,
            "count" => Command::WordCount,
            "fullscreen" => Command::ToggleFullscreen,
            "menu" => Command::ToggleMenu,
            "border" => Command::ToggleBorder,
            "mouse" => Command::ToggleMouseCursor,
            "caretvisible" => Command::ToggleCaret,
            "caretblink" => Command::ToggleCaretBlink,
            "caretspeed" => Command::CaretBlinkSpeed {
                ms: optional(rest, |s| prompt::parse_number("blink speed", s))?,
            },
            "font" => parse_font(rest)?,
            "fontsize" => Command::FontSize {
                size: optional(rest, |s| prompt::parse_number("font size", s))?,
            },
            "spacing" => Command::LineSpacing {
                spacing: optional(rest, |s| prompt::parse_number("line spacing", s))?,
            },
            "padding" => Command::Padding {
                padding: optional(rest, |s| prompt::parse_number("padding", s))?,
            },
            "borderwidth" => Command::BorderThickness {
                thickness: optional(rest, |s| prompt::parse_number("border thickness", s))?,
            },
            "caretwidth" => Command::CaretThickness {
                width: optional(rest, |s| prompt::parse_number("caret thickness", s))?,
            },
            "size" => Command::TextAreaSize {
                size: optional(rest, prompt::parse_size)?,
            },
            "color" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(n, v)| (n, v.trim()));
                let target = ColorTarget::parse(name)
                    .ok_or_else(|| CoreError::invalid(format!("unknown color target {name:?}")))?;
                Command::SetColor {
                    target,
                    color: optional(value, parse_color)?,
                }
            }
            "align" => Command::Align(
                Alignment::parse(rest)
                    .ok_or_else(|| CoreError::invalid("align takes left, center or right"))?,
            ),
            "blink" => Command::ToggleTextBlink {
                ms: optional(rest, |s| prompt::parse_number("blink speed", s))?,
            },
            "bgimage" => Command::ToggleBackgroundImage { path },
            "autosave" => Command::ToggleAutoSave,
            "autosaveinterval" => Command::AutoSaveInterval {
                ms: optional(rest, |s| prompt::parse_number("autosave interval", s))?,
            },
            "reset" => Command::ResetTheme,
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| CoreError::invalid("usage: set <key> <value>"))?;
                Command::Set {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "about" => Command::About,
            other => return Err(CoreError::CommandNotFound(other.to_string())),
        };
        Ok(cmd)
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::NewFile => "New File",
            Command::OpenFile { .. } => "Open File",
            Command::Save { .. } => "Save",
            Command::SaveAs { .. } => "Save As",
            Command::Quit => "Exit",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::SelectAll => "Select All",
            Command::InsertText(_) => "Type",
            Command::MoveCaret(_) => "Move Caret",
            Command::Find { .. } => "Search",
            Command::FindNext => "Find Next",
            Command::CloseSearch => "Close Search",
            Command::Replace { .. } => "Replace",
            Command::GotoLine { .. } => "Go to Line",
            Command::ToggleLineNumbers => "Toggle Line Numbers",
            Command::WordCount => "Word/Character Count",
            Command::ToggleFullscreen => "Toggle Fullscreen",
            Command::ToggleMenu => "Toggle Menu",
            Command::ToggleBorder => "Toggle Border",
            Command::ToggleMouseCursor => "Toggle Mouse Cursor",
            Command::ToggleCaret => "Toggle Caret Cursor",
            Command::ToggleCaretBlink => "Toggle Caret Blink",
            Command::CaretBlinkSpeed { .. } => "Caret Blink Speed",
            Command::ChangeFont { .. } => "Change Font",
            Command::FontSize { .. } => "Font Size",
            Command::LineSpacing { .. } => "Line Spacing",
            Command::Padding { .. } => "Padding",
            Command::BorderThickness { .. } => "Border Thickness",
            Command::CaretThickness { .. } => "Caret Thickness",
            Command::TextAreaSize { .. } => "Text Area Size",
            Command::SetColor { .. } => "Change Color",
            Command::Align(_) => "Align",
            Command::ToggleTextBlink { .. } => "Toggle Text Blink",
            Command::ToggleBackgroundImage { .. } => "Toggle Background Image",
            Command::ToggleAutoSave => "Toggle Autosave",
            Command::AutoSaveInterval { .. } => "Autosave Interval",
            Command::ResetTheme => "Reset to Default Theme",
            Command::Set { .. } => "Set",
            Command::About => "About",
        }
    }
}

fn optional<T>(input: &str, parse: impl FnOnce(&str) -> CoreResult<T>) -> CoreResult<Option<T>> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse(input).map(Some)
    }
}

fn parse_color(input: &str) -> CoreResult<Color> {
    input.parse().map_err(CoreError::InvalidInput)
}

/// Strips a leading `-c` / `--case` flag.
fn case_flag(rest: &str) -> (bool, &str) {
    for flag in ["-c ", "--case "] {
        if let Some(stripped) = rest.strip_prefix(flag) {
            return (true, stripped.trim_start());
        }
    }
    if rest == "-c" || rest == "--case" {
        return (true, "");
    }
    (false, rest)
}

/// `font Courier New 14 bold italic`: trailing size and style words, the
/// rest is the family.
fn parse_font(rest: &str) -> CoreResult<Command> {
    let mut words: Vec<&str> = rest.split_whitespace().collect();
    let (mut bold, mut italic, mut size) = (false, false, None);
    while let Some(last) = words.last() {
        match last.to_ascii_lowercase().as_str() {
            "bold" => bold = true,
            "italic" => italic = true,
            "regular" | "normal" => {}
            word if size.is_none() && word.bytes().all(|b| b.is_ascii_digit()) => {
                size = Some(prompt::parse_number("font size", word)?);
            }
            _ => break,
        }
        words.pop();
    }
    let family = words.join(" ");
    Ok(Command::ChangeFont {
        family: (!family.is_empty()).then_some(family),
        size,
        bold,
        italic,
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// What the surface should tell the user after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Info { title: String, message: String },
}

impl Feedback {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Feedback::Info {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// The dispatch table from commands to editor operations.
#[derive(Debug, Default)]
pub struct CommandRegistry;

impl CommandRegistry {
    /// Creates a new registry.
    pub fn new() -> Self {
        Self
    }

    /// Executes a command, asking `prompter` for anything it lacks.
    pub fn execute(
        &self,
        cmd: &Command,
        editor: &mut Editor,
        prompter: &mut dyn Prompter,
    ) -> CoreResult<Feedback> {
        tracing::debug!("Executing {}", cmd.display_name());

        match cmd {
            // File commands
            Command::NewFile => {
                editor.new_document(prompter)?;
            }
            Command::OpenFile { path } => {
                if let Some(path) = path.clone().or_else(|| prompter.ask_path(PathPurpose::Open)) {
                    editor.open_document(path)?;
                }
            }
            Command::Save { path } => {
                editor.save(path.clone(), prompter)?;
            }
            Command::SaveAs { path } => {
                editor.save_as(path.clone(), prompter)?;
            }
            Command::Quit => {
                editor.quit(prompter)?;
            }

            // Edit commands
            Command::Undo => {
                editor.undo();
            }
            Command::Redo => {
                editor.redo();
            }
            Command::Cut => {
                editor.cut()?;
            }
            Command::Copy => {
                editor.copy();
            }
            Command::Paste => editor.paste()?,
            Command::SelectAll => editor.select_all(),
            Command::InsertText(text) => editor.insert_text(text)?,
            Command::MoveCaret(offset) => editor.move_caret(*offset),
            Command::Find {
                query,
                case_sensitive,
            } => {
                let Some(query) = arg(query, || prompter.ask_text("Search", "Find:", None)) else {
                    return Ok(Feedback::None);
                };
                return Ok(search_feedback(editor.find(&query, *case_sensitive)));
            }
            Command::FindNext => {
                if editor.search().is_some() {
                    return Ok(search_feedback(editor.find_next()));
                }
                return self.execute(
                    &Command::Find {
                        query: None,
                        case_sensitive: false,
                    },
                    editor,
                    prompter,
                );
            }
            Command::CloseSearch => editor.close_search(),
            Command::Replace {
                query,
                replacement,
                case_sensitive,
            } => {
                let Some(query) = arg(query, || prompter.ask_text("Replace Text", "Find what:", None))
                else {
                    return Ok(Feedback::None);
                };
                let Some(replacement) =
                    arg(replacement, || prompter.ask_text("Replace Text", "Replace with:", None))
                else {
                    return Ok(Feedback::None);
                };
                if query.is_empty() {
                    return Ok(Feedback::None);
                }
                let count = editor.replace_all(&query, &replacement, *case_sensitive)?;
                return Ok(Feedback::info(
                    "Replace",
                    format!("Replaced {count} occurrences of '{query}' with '{replacement}'."),
                ));
            }
            Command::GotoLine { line } => {
                let line = match line {
                    Some(line) => *line,
                    None => match prompter.ask_text("Go to Line", "Enter line number:", None) {
                        Some(text) => prompt::parse_number("line", &text)?,
                        None => return Ok(Feedback::None),
                    },
                };
                editor.goto_line(line);
            }

            // View
            Command::ToggleLineNumbers => editor.toggle_line_numbers()?,
            Command::WordCount => {
                let stats = editor.text_stats();
                return Ok(Feedback::info(
                    "Word/Character Count",
                    format!("Words: {}\nCharacters: {}", stats.words, stats.characters),
                ));
            }
            Command::ToggleFullscreen => editor.toggle_fullscreen(),
            Command::ToggleMenu => {
                editor.toggle_menu();
            }
            Command::ToggleBorder => editor.toggle_border(),
            Command::ToggleMouseCursor => editor.toggle_mouse_cursor(),
            Command::ToggleCaret => editor.toggle_caret(),
            Command::ToggleCaretBlink => editor.toggle_caret_blink(),
            Command::CaretBlinkSpeed { ms } => {
                let Some(ms) = number_arg(*ms, prompter, "Cursor Blink Speed", "Enter blink speed in milliseconds (0 for no blink):")?
                else {
                    return Ok(Feedback::None);
                };
                editor.set_caret_blink_speed(ms);
            }

            // Format
            Command::ChangeFont {
                family,
                size,
                bold,
                italic,
            } => {
                let current = &editor.settings().font_family;
                let family = match family {
                    Some(family) => family.clone(),
                    None => match prompter.ask_text("Choose Font", "Font family:", Some(current.as_str())) {
                        Some(family) => family,
                        None => return Ok(Feedback::None),
                    },
                };
                let size = size.unwrap_or(editor.settings().font_size);
                editor.set_font(&family, size, *bold, *italic)?;
            }
            Command::FontSize { size } => {
                let Some(size) = number_arg(*size, prompter, "Font Size", "Enter font size:")? else {
                    return Ok(Feedback::None);
                };
                editor.set_font_size(size)?;
            }
            Command::LineSpacing { spacing } => {
                let Some(spacing) = number_arg(*spacing, prompter, "Line Spacing", "Enter line spacing:")?
                else {
                    return Ok(Feedback::None);
                };
                editor.set_line_spacing(spacing)?;
            }
            Command::Padding { padding } => {
                let Some(padding) = number_arg(*padding, prompter, "Padding", "Enter padding size:")? else {
                    return Ok(Feedback::None);
                };
                editor.set_padding(padding)?;
            }
            Command::BorderThickness { thickness } => {
                let Some(thickness) =
                    number_arg(*thickness, prompter, "Border Thickness", "Enter border thickness:")?
                else {
                    return Ok(Feedback::None);
                };
                editor.set_border_thickness(thickness)?;
            }
            Command::CaretThickness { width } => {
                let Some(width) =
                    number_arg(*width, prompter, "Caret Thickness", "Enter caret cursor thickness:")?
                else {
                    return Ok(Feedback::None);
                };
                editor.set_caret_thickness(width)?;
            }
            Command::TextAreaSize { size } => {
                let size = match size {
                    Some(size) => *size,
                    None => {
                        let current = format!("{}x{}", editor.settings().text_width, editor.settings().text_height);
                        match prompter.ask_text(
                            "Text Area Size",
                            "Enter size in pixels (width x height):",
                            Some(current.as_str()),
                        ) {
                            Some(text) => prompt::parse_size(&text)?,
                            None => return Ok(Feedback::None),
                        }
                    }
                };
                editor.set_text_area_size(size.0, size.1)?;
            }
            Command::SetColor { target, color } => {
                let color = match color {
                    Some(color) => *color,
                    None => {
                        let current = target.get(editor.settings()).to_string();
                        let title = format!("Choose {} color", target.name());
                        match prompter.ask_text(&title, "Color (#rrggbb):", Some(current.as_str())) {
                            Some(text) => parse_color(&text)?,
                            None => return Ok(Feedback::None),
                        }
                    }
                };
                editor.set_color(*target, color)?;
            }
            Command::Align(alignment) => editor.align(*alignment),
            Command::ToggleTextBlink { ms } => {
                if editor.text_blink_period().is_some() {
                    editor.stop_text_blink();
                } else {
                    let default = DEFAULT_TEXT_BLINK_MS.to_string();
                    let ms = match ms {
                        Some(ms) => *ms,
                        None => match prompter.ask_text(
                            "Blink Speed",
                            "Enter blink speed in milliseconds:",
                            Some(default.as_str()),
                        ) {
                            Some(text) => prompt::parse_number("blink speed", &text)?,
                            None => return Ok(Feedback::None),
                        },
                    };
                    editor.start_text_blink(ms)?;
                }
            }

            // Settings
            Command::ToggleBackgroundImage { path } => {
                if editor.view().background_image.is_some() {
                    editor.clear_background_image();
                } else if let Some(path) =
                    path.clone().or_else(|| prompter.ask_path(PathPurpose::BackgroundImage))
                {
                    editor.set_background_image(path)?;
                }
            }
            Command::ToggleAutoSave => {
                let enabled = editor.toggle_auto_save()?;
                return Ok(if enabled {
                    Feedback::info("Autosave Enabled", "Autosave feature has been enabled.")
                } else {
                    Feedback::info("Autosave Disabled", "Autosave feature has been disabled.")
                });
            }
            Command::AutoSaveInterval { ms } => {
                let Some(ms) = number_arg(*ms, prompter, "Autosave Interval", "Enter interval in milliseconds:")?
                else {
                    return Ok(Feedback::None);
                };
                editor.set_auto_save_interval(ms)?;
            }
            Command::ResetTheme => {
                editor.reset_theme()?;
                return Ok(Feedback::info(
                    "Reset Theme",
                    "Theme has been reset to default settings.",
                ));
            }
            Command::Set { key, value } => editor.set_setting(key, value)?,
            Command::About => return Ok(Feedback::info("About ZenEdit", ABOUT)),
        }

        Ok(Feedback::None)
    }
}

/// Uses the given argument or asks for one.
fn arg(given: &Option<String>, ask: impl FnOnce() -> Option<String>) -> Option<String> {
    given.clone().or_else(ask)
}

/// Uses the given number or asks for one; `Ok(None)` means cancelled.
fn number_arg<T: std::str::FromStr>(
    given: Option<T>,
    prompter: &mut dyn Prompter,
    title: &str,
    question: &str,
) -> CoreResult<Option<T>> {
    match given {
        Some(value) => Ok(Some(value)),
        None => prompter
            .ask_text(title, question, None)
            .map(|text| prompt::parse_number(title, &text))
            .transpose(),
    }
}

fn search_feedback(outcome: SearchOutcome) -> Feedback {
    match outcome {
        SearchOutcome::Found(_) | SearchOutcome::Wrapped(_) => Feedback::None,
        SearchOutcome::NotFound => Feedback::info("Search", "Text not found."),
    }
}
