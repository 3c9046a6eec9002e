//! Keyword list parsing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// User-supplied keywords, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordList {
    keywords: Vec<String>,
}

impl KeywordList {
    /// Parse keywords separated by commas or newlines.
    ///
    /// Entries are trimmed and empty ones dropped. Entries differing only
    /// in case collapse onto the first spelling.
    pub fn parse(content: &str) -> Self {
        let mut seen = HashSet::new();
        let keywords = content
            .split(&[',', '\n'][..])
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.to_lowercase()))
            .map(str::to_string)
            .collect();
        Self { keywords }
    }

    /// Read and parse a keyword file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Iterate keywords in their original spelling.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether there are no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let joined: Vec<String> = iter.into_iter().map(Into::into).collect();
        Self::parse(&joined.join("\n"))
    }
}
