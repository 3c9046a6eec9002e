//! The assembled book: chapters, index page and TOC directives.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{KeywordIndex, TocDirective};
use crate::toc::{assemble, Chapter};

/// A chapter together with the artifact it is included from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedChapter {
    /// Chapter data used for TOC assembly
    #[serde(flatten)]
    pub chapter: Chapter,

    /// PDF artifact included for this chapter
    pub artifact: PathBuf,
}

impl PlannedChapter {
    /// Pair a chapter with its artifact.
    pub fn new(chapter: Chapter, artifact: impl Into<PathBuf>) -> Self {
        Self {
            chapter,
            artifact: artifact.into(),
        }
    }
}

/// The compiled keyword index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPage {
    /// Compiled index PDF
    pub artifact: PathBuf,

    /// Pages in the index PDF
    pub page_count: u32,
}

/// Everything needed to render the master document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPlan {
    /// Book title shown on the title page
    pub title: String,

    /// When the plan was assembled
    pub generated_at: DateTime<Utc>,

    /// Included chapters in merge order
    pub chapters: Vec<PlannedChapter>,

    /// Compiled index page, if one was produced
    pub index_page: Option<IndexPage>,

    /// Keyword index (empty when indexing was skipped)
    pub keywords: KeywordIndex,

    /// TOC directives in emission order
    pub toc: Vec<TocDirective>,
}

impl BookPlan {
    /// Plan a book from chapters in merge order.
    pub fn new(title: impl Into<String>, chapters: Vec<PlannedChapter>) -> Self {
        let mut plan = Self {
            title: title.into(),
            generated_at: Utc::now(),
            chapters,
            index_page: None,
            keywords: KeywordIndex::new(),
            toc: Vec::new(),
        };
        plan.assemble();
        plan
    }

    /// Attach the keyword index.
    pub fn with_keywords(mut self, keywords: KeywordIndex) -> Self {
        self.keywords = keywords;
        self
    }

    /// Attach the compiled index page; appends the "Index" directive.
    pub fn with_index_page(mut self, page: IndexPage) -> Self {
        self.index_page = Some(page);
        self.assemble();
        self
    }

    /// Directives belonging to one chapter (`Some(ordinal)`) or to the index (`None`).
    pub fn directives_for(&self, document: Option<usize>) -> impl Iterator<Item = &TocDirective> {
        self.toc.iter().filter(move |d| d.document == document)
    }

    /// Total pages of all included artifacts.
    pub fn total_pages(&self) -> u32 {
        let chapters: u32 = self.chapters.iter().map(|c| c.chapter.page_count).sum();
        chapters + self.index_page.as_ref().map_or(0, |p| p.page_count)
    }

    fn assemble(&mut self) {
        let chapters: Vec<Chapter> = self.chapters.iter().map(|c| c.chapter.clone()).collect();
        self.toc = assemble(&chapters, self.index_page.as_ref().map(|p| p.page_count));
    }
}
