//! Heading classification rules.
//!
//! Rules are tried in order and the first whose predicate holds decides
//! the outcome. Chapter markers take precedence over bare leading numbers,
//! which take precedence over dotted section numbers.

use regex::Regex;

use crate::model::HeadingLevel;

/// Outcome of classifying one outline title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A chapter heading; carries the title with its marker stripped.
    Chapter(String),
    /// A numbered section or subsection.
    Heading {
        /// Section or subsection
        level: HeadingLevel,
        /// Title with the number stripped
        title: String,
    },
    /// Unnumbered or irregular heading; not part of the reconstructed TOC.
    Discard,
}

/// Compiled heading patterns.
#[derive(Debug, Clone)]
pub struct Patterns {
    chapter: Regex,
    bare_number: Regex,
    bare_number_prefix: Regex,
    section: Regex,
    section_prefix: Regex,
}

impl Patterns {
    /// Compile the heading patterns.
    pub fn new() -> Self {
        Self {
            chapter: Regex::new(r"(?i)^(?:chapter|ch)[-:\s]+\d+[:.\s-]*")
                .expect("chapter pattern compiles"),
            bare_number: Regex::new(r"^\d+\.?\s+").expect("bare number pattern compiles"),
            bare_number_prefix: Regex::new(r"^\d+\.?\s*").expect("bare number prefix compiles"),
            section: Regex::new(r"^\d+\.\d+(?:\.\d+)?\.?(?:\s|$)")
                .expect("section pattern compiles"),
            section_prefix: Regex::new(r"^\d+\.\d+(?:\.\d+)?\.?\s*")
                .expect("section prefix compiles"),
        }
    }

    /// Strip a "Chapter N" / "CH-N" marker, if present.
    pub fn strip_chapter_marker(&self, title: &str) -> Option<String> {
        let m = self.chapter.find(title)?;
        Some(or_original(&title[m.end()..], title))
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of the rule chain.
pub(crate) struct Rule {
    pub(crate) name: &'static str,
    pub(crate) matches: fn(&Patterns, &str) -> bool,
    pub(crate) apply: fn(&Patterns, &str) -> Classification,
}

/// The rule chain in precedence order.
pub(crate) const RULES: [Rule; 3] = [
    Rule {
        name: "chapter-marker",
        matches: |p, title| p.chapter.is_match(title),
        apply: |p, title| {
            Classification::Chapter(p.strip_chapter_marker(title).unwrap_or_default())
        },
    },
    Rule {
        name: "bare-number",
        matches: |p, title| p.bare_number.is_match(title) && !leading_token(title).contains('.'),
        apply: |p, title| {
            let rest = p.bare_number_prefix.replace(title, "");
            Classification::Chapter(or_original(&rest, title))
        },
    },
    Rule {
        name: "section-number",
        matches: |p, title| p.section.is_match(title),
        apply: |p, title| {
            let dots = leading_token(title).matches('.').count();
            match HeadingLevel::from_dot_count(dots) {
                Some(level) if level != HeadingLevel::Chapter => {
                    let rest = p.section_prefix.replace(title, "");
                    Classification::Heading {
                        level,
                        title: or_original(&rest, title),
                    }
                }
                _ => Classification::Discard,
            }
        },
    },
];

/// Run the rule chain on a cleaned title.
pub(crate) fn classify_clean(patterns: &Patterns, title: &str) -> Classification {
    RULES
        .iter()
        .find(|rule| (rule.matches)(patterns, title))
        .map(|rule| {
            log::debug!("'{}' matched rule {}", title, rule.name);
            (rule.apply)(patterns, title)
        })
        .unwrap_or(Classification::Discard)
}

/// First whitespace-delimited token without trailing dots.
fn leading_token(title: &str) -> &str {
    title
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches('.')
}

/// The stripped remainder, or the whole title when nothing is left.
fn or_original(rest: &str, original: &str) -> String {
    let rest = rest.trim();
    if rest.is_empty() {
        original.trim().to_string()
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(title: &str) -> Classification {
        classify_clean(&Patterns::new(), title)
    }

    #[test]
    fn test_chapter_marker_variants() {
        for title in [
            "Chapter 3: Deployment",
            "CH-3 Deployment",
            "Ch 3 - Deployment",
            "chapter 3. Deployment",
        ] {
            assert_eq!(
                classify(title),
                Classification::Chapter("Deployment".to_string()),
                "{}",
                title
            );
        }
    }

    #[test]
    fn test_chapter_marker_requires_separator() {
        assert_eq!(classify("Chapter3 Deployment"), Classification::Discard);
        assert_eq!(classify("Challenge 3"), Classification::Discard);
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(
            classify("4. Overview"),
            Classification::Chapter("Overview".to_string())
        );
        assert_eq!(
            classify("4 Overview"),
            Classification::Chapter("Overview".to_string())
        );
    }

    #[test]
    fn test_empty_remainder_keeps_original() {
        assert_eq!(
            classify("Chapter 2"),
            Classification::Chapter("Chapter 2".to_string())
        );
        assert_eq!(classify("4."), Classification::Discard);
        assert_eq!(classify("2.3"), heading(HeadingLevel::Section, "2.3"));
    }

    fn heading(level: HeadingLevel, title: &str) -> Classification {
        Classification::Heading {
            level,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_section_levels() {
        assert_eq!(
            classify("2.3 Data Pipeline"),
            heading(HeadingLevel::Section, "Data Pipeline")
        );
        assert_eq!(
            classify("2.3.1 Buffering"),
            heading(HeadingLevel::Subsection, "Buffering")
        );
        assert_eq!(
            classify("1.3. Trailing Dot"),
            heading(HeadingLevel::Section, "Trailing Dot")
        );
    }

    #[test]
    fn test_irregular_numbers_discarded() {
        assert_eq!(classify("Introduction"), Classification::Discard);
        assert_eq!(classify("1.2.3.4 Too Deep"), Classification::Discard);
        assert_eq!(classify("2.3a Lettered"), Classification::Discard);
        assert_eq!(classify("A.1 Appendix"), Classification::Discard);
    }
}
