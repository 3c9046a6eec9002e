//! Table-of-contents assembly.
//!
//! Produces one chapter directive per document followed by that document's
//! numbered headings, translating local pages to global pages as it goes.
//! Output order is merge order, never page order.

use serde::{Deserialize, Serialize};

use crate::model::{HeadingLevel, NormalizedOutline, TocDirective};
use crate::pagination::PageCursor;

/// Title of the generated index chapter.
pub const INDEX_TITLE: &str = "Index";

/// Label of the generated index chapter.
pub const INDEX_LABEL: &str = "idx";

/// A document as seen by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Position in the merge sequence; must be unique within a run
    pub ordinal: usize,

    /// Formatted display name of the document
    pub name: String,

    /// Pages in the document's artifact
    pub page_count: u32,

    /// Normalized outline of the artifact
    pub outline: NormalizedOutline,
}

impl Chapter {
    /// Create a chapter entry.
    pub fn new(
        ordinal: usize,
        name: impl Into<String>,
        page_count: u32,
        outline: NormalizedOutline,
    ) -> Self {
        Self {
            ordinal,
            name: name.into(),
            page_count,
            outline,
        }
    }

    /// Recovered chapter title, or the display name.
    ///
    /// Commas delimit directive fields, so they are replaced by spaces.
    pub fn title(&self) -> String {
        let title = self.outline.chapter_title.as_deref().unwrap_or(&self.name);
        title.replace(',', " ").trim().to_string()
    }

    /// Label of the chapter directive.
    pub fn label(&self) -> String {
        format!("chap{}", self.ordinal)
    }
}

/// Assemble TOC directives for chapters in merge order.
///
/// When `index_pages` is given, a final "Index" chapter directive points at
/// the first page after the last chapter.
pub fn assemble(chapters: &[Chapter], index_pages: Option<u32>) -> Vec<TocDirective> {
    let (mut directives, cursor) = chapters.iter().fold(
        (Vec::new(), PageCursor::start()),
        |(mut directives, cursor), chapter| {
            let (span, next) = cursor.place(chapter.page_count);

            directives.push(TocDirective {
                global_page: span.global(1),
                local_page: 1,
                level: HeadingLevel::Chapter,
                title: chapter.title(),
                label: chapter.label(),
                document: Some(chapter.ordinal),
            });

            directives.extend(chapter.outline.nodes.iter().map(|node| TocDirective {
                global_page: span.global(node.page),
                local_page: node.page,
                level: node.level,
                title: node.title.clone(),
                label: format!("sec{}-{}", chapter.ordinal, node.order),
                document: Some(chapter.ordinal),
            }));

            (directives, next)
        },
    );

    if index_pages.is_some_and(|pages| pages > 0) {
        directives.push(TocDirective {
            global_page: cursor.next_page(),
            local_page: 1,
            level: HeadingLevel::Chapter,
            title: INDEX_TITLE.to_string(),
            label: INDEX_LABEL.to_string(),
            document: None,
        });
    }

    log::debug!("Assembled {} TOC directives", directives.len());
    directives
}
