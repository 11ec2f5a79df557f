//! Per-view search term with fuzzy matching.

use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher, Utf32Str,
};

use crate::data::Searchable;

/// Search term owned by a single view
pub struct Filter {
    query: String,
    /// Whether keystrokes currently go to the query
    editing: bool,
    matcher: Matcher,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            query: String::new(),
            editing: false,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn start(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode but keep the query applied
    pub fn stop(&mut self) {
        self.editing = false;
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.editing = false;
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop(&mut self) {
        self.query.pop();
        if self.query.is_empty() {
            self.editing = false;
        }
    }

    /// Indices of rows matching the query, in input order.
    ///
    /// An empty query matches every row.
    pub fn matching<R: Searchable>(&mut self, rows: &[R]) -> Vec<usize> {
        if self.query.trim().is_empty() {
            return (0..rows.len()).collect();
        }

        let pattern = Pattern::parse(&self.query, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();
        rows.iter()
            .enumerate()
            .filter(|(_, row)| {
                let haystack = row.search_text();
                pattern
                    .score(Utf32Str::new(&haystack, &mut buf), &mut self.matcher)
                    .is_some()
            })
            .map(|(i, _)| i)
            .collect()
    }
}
