//! Outline types: the raw bookmark tree read from an artifact and the
//! normalized headings recovered from it.

use serde::{Deserialize, Serialize};

/// Document outline (bookmarks) as stored in the artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level outline items
    pub items: Vec<OutlineItem>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the outline.
    pub fn add_item(&mut self, item: OutlineItem) {
        self.items.push(item);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of items (including nested).
    pub fn total_items(&self) -> usize {
        self.preorder().count()
    }

    /// Depth-first walk: each item is yielded before its children, and
    /// siblings in document order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: self.items.iter().rev().collect(),
        }
    }
}

/// Depth-first iterator over an [`Outline`].
pub struct Preorder<'a> {
    stack: Vec<&'a OutlineItem>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a OutlineItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.stack.extend(item.children.iter().rev());
        Some(item)
    }
}

/// A single outline item (bookmark).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Target page number (1-indexed), if the destination resolved
    pub page: Option<u32>,

    /// Nesting level (0 = top level)
    pub level: u8,

    /// Child items
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(title: impl Into<String>, page: Option<u32>, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
        }
    }

    /// Add a child item.
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }

    /// Builder-style variant of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: OutlineItem) -> Self {
        self.children.push(child);
        self
    }
}

/// Hierarchy level of a table-of-contents heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// One per document
    Chapter,
    /// Numbered "X.Y"
    Section,
    /// Numbered "X.Y.Z"
    Subsection,
}

impl HeadingLevel {
    /// Numeric depth (chapter = 0).
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::Chapter => 0,
            HeadingLevel::Section => 1,
            HeadingLevel::Subsection => 2,
        }
    }

    /// Sectioning command name understood by the typesetter.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Chapter => "chapter",
            HeadingLevel::Section => "section",
            HeadingLevel::Subsection => "subsection",
        }
    }

    /// Level for a heading number containing `dots` internal dots.
    pub fn from_dot_count(dots: usize) -> Option<Self> {
        match dots {
            0 => Some(HeadingLevel::Chapter),
            1 => Some(HeadingLevel::Section),
            2 => Some(HeadingLevel::Subsection),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numbered heading recovered from a document's outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Title with the leading number stripped
    pub title: String,

    /// Title as it appeared in the outline (commas removed, trimmed)
    pub raw_title: String,

    /// Section or subsection
    pub level: HeadingLevel,

    /// Page within the owning document (1-indexed)
    pub page: u32,

    /// Discovery order within the document
    pub order: usize,
}

impl OutlineNode {
    /// Numeric depth of the node.
    pub fn depth(&self) -> u8 {
        self.level.depth()
    }
}

/// Result of normalizing one document's outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOutline {
    /// Recovered chapter title, overriding the document's display name
    pub chapter_title: Option<String>,

    /// Section and subsection headings in discovery order
    pub nodes: Vec<OutlineNode>,
}

impl NormalizedOutline {
    /// Whether nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.chapter_title.is_none() && self.nodes.is_empty()
    }
}
