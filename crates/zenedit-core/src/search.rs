//! Find / find-next over the document.

use zenedit_buffer::search::{self, Match};

use crate::document::Document;

/// Result of one search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Found after the starting point
    Found(Match),
    /// Nothing after the starting point; found from the top instead
    Wrapped(Match),
    /// No occurrence anywhere
    NotFound,
}

impl SearchOutcome {
    pub fn matched(&self) -> Option<Match> {
        match *self {
            Self::Found(m) | Self::Wrapped(m) => Some(m),
            Self::NotFound => None,
        }
    }
}

/// An open search: the query and where the last hit was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    query: String,
    case_sensitive: bool,
    last_match: Option<Match>,
}

impl SearchSession {
    pub fn new(query: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            query: query.into(),
            case_sensitive,
            last_match: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn last_match(&self) -> Option<Match> {
        self.last_match
    }

    /// Searches from the start of the document.
    pub fn find(&mut self, doc: &mut Document) -> SearchOutcome {
        self.search_from(doc, 0)
    }

    /// Searches after the last hit, or after the caret when there is none,
    /// wrapping to the top.
    pub fn find_next(&mut self, doc: &mut Document) -> SearchOutcome {
        let from = self.last_match.map_or(doc.caret(), |m| m.end);
        self.search_from(doc, from)
    }

    fn search_from(&mut self, doc: &mut Document, from: usize) -> SearchOutcome {
        if self.query.is_empty() {
            return SearchOutcome::NotFound;
        }

        let found = search::find_wrapping(&doc.text(), &self.query, from, self.case_sensitive);
        match found {
            Some((m, wrapped)) => {
                doc.select(m.range());
                self.last_match = Some(m);
                tracing::debug!("Search {:?} matched {}..{}", self.query, m.start, m.end);
                if wrapped {
                    SearchOutcome::Wrapped(m)
                } else {
                    SearchOutcome::Found(m)
                }
            }
            None => SearchOutcome::NotFound,
        }
    }

    /// Ends the search, leaving the last hit selected.
    pub fn close(self, doc: &mut Document) {
        if let Some(m) = self.last_match {
            doc.select(m.range());
        }
    }
}
