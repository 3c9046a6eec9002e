//! Table-of-contents directive type.

use super::HeadingLevel;
use serde::{Deserialize, Serialize};

/// One table-of-contents entry destined for the typesetter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocDirective {
    /// Page in the merged page sequence (1-indexed)
    pub global_page: u32,

    /// Page within the owning artifact (1-indexed)
    pub local_page: u32,

    /// Chapter, section or subsection
    pub level: HeadingLevel,

    /// Clean title
    pub title: String,

    /// Label unique within one merge run
    pub label: String,

    /// Ordinal of the owning document; `None` for the generated index
    pub document: Option<usize>,
}

impl TocDirective {
    /// Numeric depth (chapter = 0).
    pub fn depth(&self) -> u8 {
        self.level.depth()
    }

    /// Whether this is a chapter-level entry.
    pub fn is_chapter(&self) -> bool {
        self.level == HeadingLevel::Chapter
    }
}

/// Formats as `global_page,level,depth,title,label`.
impl std::fmt::Display for TocDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.global_page,
            self.level,
            self.depth(),
            self.title,
            self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_display() {
        let directive = TocDirective {
            global_page: 16,
            local_page: 1,
            level: HeadingLevel::Section,
            title: "Data Pipeline".to_string(),
            label: "sec3-0".to_string(),
            document: Some(3),
        };
        assert_eq!(directive.to_string(), "16,section,1,Data Pipeline,sec3-0");
        assert!(!directive.is_chapter());
    }
}
