//! Access to page-bearing artifacts.
//!
//! Provides a trait-based interface over converted documents so the
//! outline normalizer and keyword indexer never touch a concrete PDF
//! library. [`PdfArtifact`] reads real files through lopdf;
//! [`MemoryArtifact`] holds pages in memory.

mod pdf;

pub use pdf::PdfArtifact;

use crate::error::{Error, Result};
use crate::model::Outline;

/// A converted document exposing pages, page text and an optional outline.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> Result<u32>;

    /// Plain text of a page (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;

    /// Outline tree, `None` when the artifact carries no bookmarks.
    fn outline(&self) -> Result<Option<Outline>>;

    /// Text of the first page, if there is one and it can be extracted.
    fn first_page_text(&self) -> Option<String> {
        match self.page_count() {
            Ok(0) | Err(_) => None,
            Ok(_) => match self.page_text(1) {
                Ok(text) => Some(text),
                Err(e) => {
                    log::warn!("First-page text extraction failed: {}", e);
                    None
                }
            },
        }
    }
}

/// An artifact held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifact {
    pages: Vec<Option<String>>,
    outline: Option<Outline>,
    outline_broken: bool,
    page_count_unknown: bool,
}

impl MemoryArtifact {
    /// Create an artifact from page texts.
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(|p| Some(p.into())).collect(),
            ..Default::default()
        }
    }

    /// Create an artifact with `count` empty pages.
    pub fn blank(count: u32) -> Self {
        Self {
            pages: vec![Some(String::new()); count as usize],
            ..Default::default()
        }
    }

    /// Attach an outline.
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Make text extraction fail for a page (1-indexed).
    pub fn with_unreadable_page(mut self, page: u32) -> Self {
        if let Some(slot) = page
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i as usize))
        {
            *slot = None;
        }
        self
    }

    /// Make outline reading fail.
    pub fn with_broken_outline(mut self) -> Self {
        self.outline_broken = true;
        self
    }

    /// Make the page count unreadable.
    pub fn with_unknown_page_count(mut self) -> Self {
        self.page_count_unknown = true;
        self
    }
}

impl PageSource for MemoryArtifact {
    fn page_count(&self) -> Result<u32> {
        if self.page_count_unknown {
            return Err(Error::PdfParse("page tree unreadable".to_string()));
        }
        Ok(self.pages.len() as u32)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let count = self.pages.len() as u32;
        let slot = page
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(Error::PageOutOfRange(page, count))?;
        slot.clone()
            .ok_or_else(|| Error::TextExtract(format!("Page {}: unreadable", page)))
    }

    fn outline(&self) -> Result<Option<Outline>> {
        if self.outline_broken {
            return Err(Error::OutlineRead("malformed outline tree".to_string()));
        }
        Ok(self.outline.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutlineItem;

    #[test]
    fn test_memory_artifact_pages() {
        let artifact = MemoryArtifact::new(["one", "two"]);
        assert_eq!(artifact.page_count().unwrap(), 2);
        assert_eq!(artifact.page_text(2).unwrap(), "two");
        assert!(matches!(
            artifact.page_text(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
        assert!(matches!(
            artifact.page_text(0),
            Err(Error::PageOutOfRange(0, 2))
        ));
    }

    #[test]
    fn test_memory_artifact_failures() {
        let artifact = MemoryArtifact::blank(3)
            .with_unreadable_page(2)
            .with_broken_outline();
        assert!(artifact.page_text(1).is_ok());
        assert!(matches!(artifact.page_text(2), Err(Error::TextExtract(_))));
        assert!(matches!(artifact.outline(), Err(Error::OutlineRead(_))));
    }

    #[test]
    fn test_first_page_text() {
        let artifact = MemoryArtifact::new(["Chapter 1: Start", "body"]);
        assert_eq!(artifact.first_page_text().as_deref(), Some("Chapter 1: Start"));

        assert_eq!(MemoryArtifact::blank(0).first_page_text(), None);
        assert_eq!(
            MemoryArtifact::blank(2).with_unreadable_page(1).first_page_text(),
            None
        );
    }

    #[test]
    fn test_outline_passthrough() {
        let mut outline = Outline::new();
        outline.add_item(OutlineItem::new("1.1 Scope", Some(1), 0));
        let artifact = MemoryArtifact::blank(1).with_outline(outline.clone());
        assert_eq!(artifact.outline().unwrap(), Some(outline));
        assert_eq!(MemoryArtifact::blank(1).outline().unwrap(), None);
    }
}
