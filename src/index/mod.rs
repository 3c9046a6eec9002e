//! Keyword indexing across the merged page sequence.
//!
//! Every page of every document is searched, in merge order, for each
//! keyword. Matches are recorded under the page's global number (see
//! [`crate::pagination`]). Keywords that never match are left out.
//!
//! # Example
//!
//! ```
//! use bookmerge::artifact::{MemoryArtifact, PageSource};
//! use bookmerge::index::{KeywordIndexer, KeywordList};
//!
//! let a = MemoryArtifact::new(["intro", "the Pipeline"]);
//! let b = MemoryArtifact::new(["pipeline again"]);
//! let sources: Vec<Option<&dyn PageSource>> = vec![Some(&a as &dyn PageSource), Some(&b)];
//!
//! let keywords = KeywordList::parse("Pipeline, Buffering");
//! let index = KeywordIndexer::new().index(&keywords, sources);
//! assert_eq!(index.pages("Pipeline"), Some(vec![2, 3]));
//! assert_eq!(index.pages("Buffering"), None);
//! ```

mod keywords;

pub use keywords::KeywordList;

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::artifact::PageSource;
use crate::error::Result;
use crate::model::KeywordIndex;
use crate::pagination::PageCursor;

/// How a keyword is matched against page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    /// Case-insensitive substring ("art" matches "chart")
    #[default]
    Substring,
    /// Case-insensitive match bounded by non-alphanumeric characters
    WholeWord,
}

/// Options for keyword indexing.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Matching strategy
    pub match_mode: MatchMode,

    /// Match a document's pages in parallel
    pub parallel: bool,
}

impl IndexOptions {
    /// Create new index options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set match mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Require whole-word matches.
    pub fn whole_word(mut self) -> Self {
        self.match_mode = MatchMode::WholeWord;
        self
    }

    /// Enable or disable parallel page matching.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Why indexing did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No keyword file exists
    NoKeywordFile,
    /// The keyword source contained no keywords
    EmptyKeywordFile,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoKeywordFile => f.write_str("no keyword file"),
            SkipReason::EmptyKeywordFile => f.write_str("keyword file is empty"),
        }
    }
}

/// Result of an indexing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Indexing ran; the index may still be empty if nothing matched.
    Built(KeywordIndex),
    /// Indexing was skipped.
    Skipped(SkipReason),
}

impl IndexOutcome {
    /// The index, if one was built and is non-empty.
    pub fn into_index(self) -> Option<KeywordIndex> {
        match self {
            IndexOutcome::Built(index) if !index.is_empty() => Some(index),
            _ => None,
        }
    }
}

/// Builds keyword indexes.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndexer {
    options: IndexOptions,
}

impl KeywordIndexer {
    /// Create an indexer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an indexer with custom options.
    pub fn with_options(options: IndexOptions) -> Self {
        Self { options }
    }

    /// Index a keyword file. A missing file or empty list skips indexing.
    pub fn index_file<'a, P, I>(&self, path: P, sources: I) -> Result<IndexOutcome>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = Option<&'a dyn PageSource>>,
    {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No {} found, skipping index generation", path.display());
            return Ok(IndexOutcome::Skipped(SkipReason::NoKeywordFile));
        }
        let keywords = KeywordList::from_file(path)?;
        Ok(self.index_keywords(&keywords, sources))
    }

    /// Index a keyword list. An empty list skips indexing.
    pub fn index_keywords<'a, I>(&self, keywords: &KeywordList, sources: I) -> IndexOutcome
    where
        I: IntoIterator<Item = Option<&'a dyn PageSource>>,
    {
        if keywords.is_empty() {
            log::warn!("Keyword list is empty, skipping index generation");
            return IndexOutcome::Skipped(SkipReason::EmptyKeywordFile);
        }
        IndexOutcome::Built(self.index(keywords, sources))
    }

    /// Search every page of `sources`, in order, for each keyword.
    ///
    /// `None` marks a document without an artifact; it occupies no pages.
    /// A document whose page count cannot be read is treated the same way.
    pub fn index<'a, I>(&self, keywords: &KeywordList, sources: I) -> KeywordIndex
    where
        I: IntoIterator<Item = Option<&'a dyn PageSource>>,
    {
        let needles: Vec<(&str, String)> = keywords.iter().map(|k| (k, fold_case(k))).collect();
        let mut index = KeywordIndex::new();
        let mut cursor = PageCursor::start();

        for (position, source) in sources.into_iter().enumerate() {
            let Some(source) = source else {
                log::warn!("Document {} has no artifact, skipped for indexing", position + 1);
                continue;
            };
            let count = match source.page_count() {
                Ok(count) => count,
                Err(e) => {
                    log::warn!("Document {} skipped for indexing: {}", position + 1, e);
                    continue;
                }
            };
            let (span, next) = cursor.place(count);
            cursor = next;

            let pages: Vec<(u32, String)> = (1..=count)
                .map(|local| (span.global(local), page_text_folded(source, local)))
                .collect();

            for (keyword, page) in self.scan(&needles, &pages) {
                index.insert(keyword, page);
            }
        }

        log::info!(
            "Indexed {} of {} keywords across {} pages",
            index.len(),
            needles.len(),
            cursor.next_page() - 1
        );
        index
    }

    fn scan<'k>(
        &self,
        needles: &[(&'k str, String)],
        pages: &[(u32, String)],
    ) -> Vec<(&'k str, u32)> {
        let mode = self.options.match_mode;
        let hits = |(page, text): &(u32, String)| {
            needles
                .iter()
                .filter(|(_, needle)| matches(mode, text, needle))
                .map(|(keyword, _)| (*keyword, *page))
                .collect::<Vec<_>>()
        };

        if self.options.parallel {
            pages.par_iter().flat_map_iter(hits).collect()
        } else {
            pages.iter().flat_map(hits).collect()
        }
    }
}

/// Index with default options.
pub fn index<'a, I>(keywords: &KeywordList, sources: I) -> KeywordIndex
where
    I: IntoIterator<Item = Option<&'a dyn PageSource>>,
{
    KeywordIndexer::new().index(keywords, sources)
}

/// NFC-normalize and lowercase.
fn fold_case(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Case-folded text of a page; unreadable pages count as empty.
fn page_text_folded(source: &dyn PageSource, page: u32) -> String {
    match source.page_text(page) {
        Ok(text) => fold_case(&text),
        Err(e) => {
            log::warn!("Page {} contributes no keywords: {}", page, e);
            String::new()
        }
    }
}

fn matches(mode: MatchMode, haystack: &str, needle: &str) -> bool {
    match mode {
        MatchMode::Substring => haystack.contains(needle),
        MatchMode::WholeWord => contains_word(haystack, needle),
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
