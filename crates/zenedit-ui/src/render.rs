//! Draws the editor onto a terminal.
//!
//! Pixel settings map onto character cells at [`PX_PER_COLUMN`] pixels per
//! column. Without color the output is plain text: no escapes, no caret
//! cell, no selection highlight.

use std::io::{self, Write};
use std::ops::Range;

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use unicode_width::UnicodeWidthStr;
use zenedit_core::{Alignment, Color, Editor, SurfaceStyle};

/// Pixel width of one terminal column.
pub const PX_PER_COLUMN: u32 = 8;

/// Thick borders are drawn with at most this many rows.
const MAX_BORDER_ROWS: u32 = 3;

const MENU: &str = "File  Edit  Search  Format  View  Settings  Help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Text,
    Selected,
    Caret,
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Number of text columns for a pixel width.
pub fn columns(width_px: u32) -> usize {
    (width_px / PX_PER_COLUMN).max(1) as usize
}

/// Leading spaces that align `line` (covering `range`) within `columns`.
fn indent(style: &SurfaceStyle, range: &Range<usize>, line: &str, columns: usize) -> usize {
    let Some(span) = &style.alignment else {
        return 0;
    };
    let covered = span.range.start <= range.end
        && (range.start < span.range.end || range.start == span.range.start);
    if !covered {
        return 0;
    }
    let free = columns.saturating_sub(UnicodeWidthStr::width(line));
    match span.alignment {
        Alignment::Left => 0,
        Alignment::Center => free / 2,
        Alignment::Right => free,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders title, menu, border, text and status line.
    pub fn render<W: Write>(&self, out: &mut W, editor: &Editor) -> io::Result<()> {
        let style = editor.surface_style();
        let columns = columns(style.width);
        let pad = " ".repeat(style.padding.div_ceil(PX_PER_COLUMN) as usize);

        if !style.fullscreen {
            self.paint(out, &editor.title(), style.text, style.root_background, true)?;
            writeln!(out)?;
        }
        if style.show_menu {
            self.paint(out, MENU, style.text, style.root_background, false)?;
            writeln!(out)?;
        }
        if let Some(image) = &style.background_image {
            writeln!(out, "[background: {}]", image.display())?;
        }

        let rule = "─".repeat(columns + 2 * pad.len());
        self.border(out, &style, &rule)?;

        let doc = editor.document();
        let text = doc.text();
        let selection = doc.cursor().selection();
        let caret = (style.caret_width > 0).then(|| doc.caret());
        let cell_at = |idx: usize| {
            if caret == Some(idx) {
                Cell::Caret
            } else if selection.as_ref().is_some_and(|s| s.contains(&idx)) {
                Cell::Selected
            } else {
                Cell::Text
            }
        };

        let mut start = 0;
        for line in text.split('\n') {
            let len = line.chars().count();
            let range = start..start + len;
            let lead = indent(&style, &range, line, columns);
            self.paint(out, &format!("{pad}{}", " ".repeat(lead)), style.text, style.background, false)?;

            let mut run = String::new();
            let mut run_cell = Cell::Text;
            for (idx, ch) in range.clone().zip(line.chars()) {
                let cell = cell_at(idx);
                if cell != run_cell && !run.is_empty() {
                    self.paint_cell(out, &run, run_cell, &style)?;
                    run.clear();
                }
                run_cell = cell;
                run.push(ch);
            }
            if !run.is_empty() {
                self.paint_cell(out, &run, run_cell, &style)?;
            }
            if self.color && caret == Some(range.end) {
                self.paint_cell(out, " ", Cell::Caret, &style)?;
            }
            writeln!(out)?;
            start = range.end + 1;
        }

        self.border(out, &style, &rule)?;
        writeln!(out, "{}", status_line(editor))?;
        out.flush()
    }

    fn border<W: Write>(&self, out: &mut W, style: &SurfaceStyle, rule: &str) -> io::Result<()> {
        for _ in 0..style.border_thickness.min(MAX_BORDER_ROWS) {
            self.paint(out, rule, style.border_color, style.root_background, false)?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn paint_cell<W: Write>(&self, out: &mut W, text: &str, cell: Cell, style: &SurfaceStyle) -> io::Result<()> {
        let (fg, bg) = match cell {
            Cell::Text => (style.text, style.background),
            Cell::Selected => (style.selection_text, style.selection),
            Cell::Caret => (style.background, style.caret),
        };
        self.paint(out, text, fg, bg, style.font.bold)
    }

    fn paint<W: Write>(&self, out: &mut W, text: &str, fg: Color, bg: Color, bold: bool) -> io::Result<()> {
        if !self.color {
            return write!(out, "{text}");
        }
        queue!(out, SetForegroundColor(term_color(fg)), SetBackgroundColor(term_color(bg)))?;
        if bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)
    }
}

/// `Ln 2, Col 5 | Arial 16 | autosave on`
pub fn status_line(editor: &Editor) -> String {
    let doc = editor.document();
    let (line, col) = doc
        .buffer()
        .char_idx_to_position(doc.caret())
        .map_or((1, 1), |p| (p.line + 1, p.column + 1));
    let autosave = if editor.settings().auto_save_enabled { "on" } else { "off" };
    format!(
        "Ln {line}, Col {col} | {} | autosave {autosave}",
        editor.surface_style().font
    )
}
