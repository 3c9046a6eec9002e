//! JSON rendering for book plans.

use crate::error::{Error, Result};
use crate::plan::BookPlan;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a book plan to JSON.
pub fn to_json(plan: &BookPlan, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(plan),
        JsonFormat::Compact => serde_json::to_string(plan),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeywordIndex, NormalizedOutline};
    use crate::plan::PlannedChapter;
    use crate::toc::Chapter;

    fn plan() -> BookPlan {
        let mut keywords = KeywordIndex::new();
        keywords.insert("Pipeline", 3);
        BookPlan::new(
            "Test Book",
            vec![PlannedChapter::new(
                Chapter::new(1, "Intro", 4, NormalizedOutline::default()),
                "converted/Intro.pdf",
            )],
        )
        .with_keywords(keywords)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&plan(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test Book\""));
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"Pipeline\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&plan(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"label\":\"chap1\""));
    }

    #[test]
    fn test_json_round_trip() {
        let plan = plan();
        let json = to_json(&plan, JsonFormat::Compact).unwrap();
        let back: BookPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
