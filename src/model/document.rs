//! Document-level types.

use crate::detect::SourceFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One input document in the merge sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Formatted display name (used when no chapter title is recovered)
    pub name: String,

    /// Original input file
    pub source: PathBuf,

    /// Source format
    pub format: SourceFormat,

    /// Position in the merge sequence (1-indexed)
    pub ordinal: usize,

    /// Page-bearing artifact, once converted
    pub artifact: Option<PathBuf>,
}

impl Document {
    /// Create a document for a source file at the given merge position.
    pub fn new(source: impl Into<PathBuf>, format: SourceFormat, ordinal: usize) -> Self {
        let source = source.into();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name: display_name(&stem),
            source,
            format,
            ordinal,
            artifact: None,
        }
    }

    /// Attach the converted artifact.
    pub fn attach_artifact(&mut self, artifact: impl Into<PathBuf>) {
        self.artifact = Some(artifact.into());
    }

    /// Path of the converted artifact, if any.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    /// Whether conversion produced an artifact.
    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }
}

/// Format a file stem for display: underscores become spaces and every
/// alphabetic run is title-cased ("data_PIPELINE-v2" -> "Data Pipeline-V2").
pub fn display_name(stem: &str) -> String {
    let spaced = stem.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
