//! Outline normalization.
//!
//! Recovers a chapter title and a flat list of numbered section and
//! subsection headings from a document's bookmark tree. When the tree
//! yields no chapter title, the first lines of the first page are searched
//! for a chapter marker instead.
//!
//! # Example
//!
//! ```
//! use bookmerge::model::{HeadingLevel, Outline, OutlineItem};
//! use bookmerge::outline::normalize;
//!
//! let mut outline = Outline::new();
//! outline.add_item(OutlineItem::new("Chapter 2: Ingest", Some(1), 0));
//! outline.add_item(OutlineItem::new("2.1 Sources", Some(3), 0));
//!
//! let result = normalize(Some(&outline), None);
//! assert_eq!(result.chapter_title.as_deref(), Some("Ingest"));
//! assert_eq!(result.nodes[0].level, HeadingLevel::Section);
//! assert_eq!(result.nodes[0].page, 3);
//! ```

mod rules;

pub use rules::{Classification, Patterns};

use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

use crate::artifact::PageSource;
use crate::model::{NormalizedOutline, Outline, OutlineNode};

/// Number of first-page lines searched for a chapter marker.
pub const FIRST_PAGE_SCAN_LINES: usize = 5;

/// Normalizes outline trees into chapter titles and numbered headings.
///
/// Holds only compiled patterns; normalizing the same input twice yields
/// the same result.
#[derive(Debug, Clone, Default)]
pub struct OutlineNormalizer {
    patterns: Patterns,
}

impl OutlineNormalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a single outline title.
    pub fn classify(&self, title: &str) -> Classification {
        rules::classify_clean(&self.patterns, &clean_title(title))
    }

    /// Normalize an outline, falling back to first-page text for the chapter title.
    pub fn normalize(
        &self,
        outline: Option<&Outline>,
        first_page_text: Option<&str>,
    ) -> NormalizedOutline {
        let (chapter_title, nodes) = outline
            .map(|o| self.walk(o))
            .unwrap_or_default();

        let chapter_title =
            chapter_title.or_else(|| first_page_text.and_then(|text| self.scan_first_page(text)));

        NormalizedOutline {
            chapter_title,
            nodes,
        }
    }

    /// Normalize a page source. Read failures degrade to an empty result.
    pub fn normalize_source(&self, source: &dyn PageSource) -> NormalizedOutline {
        let outline = match source.outline() {
            Ok(outline) => outline,
            Err(e) => {
                log::warn!("Could not read outline: {}", e);
                None
            }
        };

        let (chapter_title, nodes) = outline
            .as_ref()
            .map(|o| self.walk(o))
            .unwrap_or_default();

        let chapter_title = chapter_title.or_else(|| {
            source
                .first_page_text()
                .and_then(|text| self.scan_first_page(&text))
        });

        NormalizedOutline {
            chapter_title,
            nodes,
        }
    }

    /// Walk the tree depth-first; the first chapter title wins.
    fn walk(&self, outline: &Outline) -> (Option<String>, Vec<OutlineNode>) {
        outline
            .preorder()
            .map(|item| {
                let raw = clean_title(&item.title);
                let class = rules::classify_clean(&self.patterns, &raw);
                (item, raw, class)
            })
            .fold(
                (None, Vec::new()),
                |(chapter, mut nodes): (Option<String>, Vec<OutlineNode>), (item, raw, class)| {
                    match class {
                        Classification::Chapter(title) => (chapter.or(Some(title)), nodes),
                        Classification::Heading { level, title } => {
                            match item.page {
                                Some(page) => {
                                    let order = nodes.len();
                                    nodes.push(OutlineNode {
                                        title,
                                        raw_title: raw,
                                        level,
                                        page,
                                        order,
                                    });
                                }
                                None => {
                                    log::warn!("Dropping '{}': destination page unresolved", raw)
                                }
                            }
                            (chapter, nodes)
                        }
                        Classification::Discard => (chapter, nodes),
                    }
                },
            )
    }

    /// Search the leading lines of a page for a chapter marker.
    fn scan_first_page(&self, text: &str) -> Option<String> {
        let found = text
            .lines()
            .take(FIRST_PAGE_SCAN_LINES)
            .map(clean_title)
            .find_map(|line| self.patterns.strip_chapter_marker(&line));
        if let Some(ref title) = found {
            log::info!("Recovered chapter title from first page: '{}'", title);
        }
        found
    }
}

/// Remove commas (they delimit typesetter directives), normalize to NFC, trim.
fn clean_title(title: &str) -> String {
    title.replace(',', " ").nfc().collect::<String>().trim().to_string()
}

fn shared() -> &'static OutlineNormalizer {
    static NORMALIZER: OnceLock<OutlineNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(OutlineNormalizer::new)
}

/// Normalize an outline with a shared normalizer.
pub fn normalize(outline: Option<&Outline>, first_page_text: Option<&str>) -> NormalizedOutline {
    shared().normalize(outline, first_page_text)
}

/// Normalize a page source with a shared normalizer.
pub fn normalize_source(source: &dyn PageSource) -> NormalizedOutline {
    shared().normalize_source(source)
}
