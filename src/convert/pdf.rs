//! PDF passthrough converter.

use crate::detect::detect_pdf_version;
use crate::error::Result;
use crate::model::Document;
use std::path::{Path, PathBuf};

use super::{ConvertOptions, DocumentConverter};

/// Uses a PDF source as its own artifact.
#[derive(Debug, Clone, Default)]
pub struct PdfPassthrough {
    _private: (),
}

impl PdfPassthrough {
    /// Create a new passthrough converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfPassthrough {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert(
        &self,
        document: &Document,
        _work_dir: &Path,
        _options: &ConvertOptions,
    ) -> Result<PathBuf> {
        let version = detect_pdf_version(&document.source)?;
        log::debug!("'{}' is PDF {}, used as-is", document.name, version);
        Ok(document.source.clone())
    }
}
