//! Free-text invoice search.

use crate::invoice::Invoice;

/// Parsed `search` query.
///
/// Terms are whitespace separated and matched case-insensitively against
/// [`Invoice::search_text`]; every term has to match. An empty or blank
/// query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    terms: Vec<String>,
}

impl SearchFilter {
    pub fn parse(query: Option<&str>) -> Self {
        let terms = query
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let haystack = invoice.search_text().to_lowercase();
        self.terms.iter().all(|t| haystack.contains(t.as_str()))
    }
}
