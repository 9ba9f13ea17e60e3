//! Literal substring search and replace over a whole document.
//!
//! Matching is plain character comparison, no regular expressions.
//! Case-insensitive matching compares the lowercase forms of each
//! character pair, so match offsets always line up with the original text
//! even for characters whose lowercase form is longer than one char.
//!
//! All offsets are character offsets.

use std::ops::Range;

/// A match span in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    /// The span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of a replace-all pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// The rewritten document
    pub text: String,
    /// Number of occurrences replaced
    pub count: usize,
}

#[inline]
fn chars_match(a: char, b: char, case_sensitive: bool) -> bool {
    a == b || (!case_sensitive && a.to_lowercase().eq(b.to_lowercase()))
}

#[inline]
fn matches_at(hay: &[char], needle: &[char], at: usize, case_sensitive: bool) -> bool {
    hay[at..at + needle.len()]
        .iter()
        .zip(needle)
        .all(|(&a, &b)| chars_match(a, b, case_sensitive))
}

fn find_in(hay: &[char], needle: &[char], from: usize, case_sensitive: bool) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    let last = hay.len() - needle.len();
    (from..=last).find(|&i| matches_at(hay, needle, i, case_sensitive))
}

/// Finds the first occurrence of `query` starting at or after `from`.
///
/// An empty query never matches.
pub fn find(text: &str, query: &str, from: usize, case_sensitive: bool) -> Option<Match> {
    let hay: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    find_in(&hay, &needle, from, case_sensitive).map(|start| Match {
        start,
        end: start + needle.len(),
    })
}

/// Finds the next occurrence at or after `from`, wrapping to the start of
/// the document when nothing follows.
///
/// Returns `None` exactly once when the document has no occurrence at all;
/// the scan covers the document at most once in each direction, so it can't
/// loop.
pub fn find_wrapping(text: &str, query: &str, from: usize, case_sensitive: bool) -> Option<(Match, bool)> {
    if let Some(found) = find(text, query, from, case_sensitive) {
        return Some((found, false));
    }
    if from == 0 {
        return None;
    }
    find(text, query, 0, case_sensitive).map(|found| (found, true))
}

/// Counts non-overlapping occurrences, scanning left to right.
pub fn count(text: &str, query: &str, case_sensitive: bool) -> usize {
    replace_all(text, query, query, case_sensitive).count
}

/// Replaces every non-overlapping occurrence of `query` in one left-to-right
/// pass and reports how many were replaced.
///
/// The replacement is inserted literally, whatever the case of the matched
/// text. An empty query is a no-op.
pub fn replace_all(text: &str, query: &str, replacement: &str, case_sensitive: bool) -> Replaced {
    if query.is_empty() {
        return Replaced {
            text: text.to_string(),
            count: 0,
        };
    }

    if case_sensitive {
        let count = text.matches(query).count();
        return Replaced {
            text: text.replace(query, replacement),
            count,
        };
    }

    let hay: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut i = 0;

    while i < hay.len() {
        if i + needle.len() <= hay.len() && matches_at(&hay, &needle, i, false) {
            out.push_str(replacement);
            i += needle.len();
            count += 1;
        } else {
            out.push(hay[i]);
            i += 1;
        }
    }

    Replaced { text: out, count }
}
