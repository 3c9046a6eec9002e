//! Global page numbering across the merge sequence.
//!
//! Each document occupies a contiguous span of the merged page sequence,
//! starting right after the previous document's span. The running position
//! is an explicit [`PageCursor`] value passed from document to document.

use serde::{Deserialize, Serialize};

/// Position of the next unassigned global page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    next: u32,
}

impl PageCursor {
    /// Cursor at global page 1.
    pub const fn start() -> Self {
        Self { next: 1 }
    }

    /// Global number the next placed page receives.
    pub fn next_page(&self) -> u32 {
        self.next
    }

    /// Place a document of `page_count` pages, returning its span and the advanced cursor.
    pub fn place(self, page_count: u32) -> (PageSpan, PageCursor) {
        let span = PageSpan {
            first: self.next,
            count: page_count,
        };
        let cursor = PageCursor {
            next: self.next.saturating_add(page_count),
        };
        (span, cursor)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::start()
    }
}

/// The global pages occupied by one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    /// Global number of the document's first page
    pub first: u32,
    /// Number of pages
    pub count: u32,
}

impl PageSpan {
    /// Global number of a local page (1-indexed).
    ///
    /// Out-of-span local pages are translated arithmetically rather than
    /// clamped, so a malformed outline stays visible downstream.
    pub fn global(&self, local_page: u32) -> u32 {
        self.global_index(local_page.saturating_sub(1))
    }

    /// Global number of a local page (0-indexed).
    pub fn global_index(&self, index: u32) -> u32 {
        self.first.saturating_add(index)
    }

    /// Global number of the last page, `None` for an empty span.
    pub fn last(&self) -> Option<u32> {
        self.count.checked_sub(1).map(|i| self.global_index(i))
    }

    /// Whether the span has no pages.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Lay out documents with the given page counts in merge order.
///
/// Returns one span per document plus the cursor after the last one.
pub fn layout<I>(page_counts: I) -> (Vec<PageSpan>, PageCursor)
where
    I: IntoIterator<Item = u32>,
{
    page_counts.into_iter().fold(
        (Vec::new(), PageCursor::start()),
        |(mut spans, cursor), count| {
            let (span, cursor) = cursor.place(count);
            spans.push(span);
            (spans, cursor)
        },
    )
}
