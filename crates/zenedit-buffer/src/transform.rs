//! Whole-document text transforms: line numbering and counting.

/// Separator between a line number and the line content.
pub const LINE_NUMBER_DELIMITER: &str = ". ";

/// Word and character totals for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Whitespace-delimited tokens
    pub words: usize,
    /// Characters, not counting one trailing newline
    pub characters: usize,
}

/// Counts words and characters.
///
/// A single trailing newline is the document terminator and is not counted.
pub fn stats(text: &str) -> TextStats {
    let body = text.strip_suffix('\n').unwrap_or(text);
    TextStats {
        words: text.split_whitespace().count(),
        characters: body.chars().count(),
    }
}

/// Returns the content after a `<digits>. ` prefix, if the line has one.
pub fn strip_line_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(LINE_NUMBER_DELIMITER)
}

/// Returns true if the first line carries a line-number prefix.
pub fn has_line_numbers(text: &str) -> bool {
    let first = text.split('\n').next().unwrap_or_default();
    strip_line_number(first).is_some()
}

/// Adds or removes line numbers.
///
/// When the first line already starts with `<digits>. `, one such prefix is
/// stripped from every line that has it. Otherwise every line, including a
/// final empty one, is prefixed with its 1-based number.
pub fn toggle_line_numbers(text: &str) -> String {
    let lines = text.split('\n');
    let rewritten: Vec<String> = if has_line_numbers(text) {
        lines
            .map(|line| strip_line_number(line).unwrap_or(line).to_string())
            .collect()
    } else {
        lines
            .enumerate()
            .map(|(i, line)| format!("{}{LINE_NUMBER_DELIMITER}{line}", i + 1))
            .collect()
    };
    rewritten.join("\n")
}
