//! Keyword index type.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from keyword (original spelling) to the global pages it occurs on.
///
/// Only keywords with at least one page are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordIndex {
    entries: BTreeMap<String, BTreeSet<u32>>,
}

impl KeywordIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `keyword` occurs on `page`.
    pub fn insert(&mut self, keyword: &str, page: u32) {
        self.entries
            .entry(keyword.to_string())
            .or_default()
            .insert(page);
    }

    /// Record several pages for `keyword`. An empty iterator leaves the index unchanged.
    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, keyword: &str, pages: I) {
        let mut pages = pages.into_iter().peekable();
        if pages.peek().is_some() {
            self.entries
                .entry(keyword.to_string())
                .or_default()
                .extend(pages);
        }
    }

    /// Pages for a keyword, ascending. Lookup is case-insensitive.
    pub fn pages(&self, keyword: &str) -> Option<Vec<u32>> {
        let wanted = keyword.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, pages)| pages.iter().copied().collect())
    }

    /// Number of keywords with at least one page.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keyword was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted case-insensitively for presentation.
    pub fn sorted_entries(&self) -> Vec<(&str, Vec<u32>)> {
        let mut entries: Vec<(&str, Vec<u32>)> = self
            .entries
            .iter()
            .map(|(k, pages)| (k.as_str(), pages.iter().copied().collect()))
            .collect();
        entries.sort_by(|a, b| {
            a.0.to_lowercase()
                .cmp(&b.0.to_lowercase())
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedups_and_sorts() {
        let mut index = KeywordIndex::new();
        index.insert("Pipeline", 16);
        index.insert("Pipeline", 3);
        index.insert("Pipeline", 16);
        assert_eq!(index.pages("Pipeline"), Some(vec![3, 16]));
        assert_eq!(index.pages("pipeline"), Some(vec![3, 16]));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_extend_empty_is_noop() {
        let mut index = KeywordIndex::new();
        index.extend("Buffering", Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.pages("Buffering"), None);
    }

    #[test]
    fn test_sorted_entries_case_insensitive() {
        let mut index = KeywordIndex::new();
        index.insert("beta", 2);
        index.insert("Alpha", 1);
        index.insert("Gamma", 3);
        let keys: Vec<_> = index.sorted_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Alpha", "beta", "Gamma"]);
    }
}
