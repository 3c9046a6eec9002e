//! XeLaTeX converter for `.tex` sources.

use crate::error::{Error, Result};
use crate::model::Document;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{output_tail, run_tool, ConvertOptions, DocumentConverter};

/// Compiles standalone LaTeX sources with xelatex.
///
/// The artifact is `<work_dir>/<source stem>.pdf`. A non-zero exit is
/// tolerated when the PDF was still produced.
#[derive(Debug, Clone, Default)]
pub struct LatexConverter {
    _private: (),
}

impl LatexConverter {
    /// Create a new LaTeX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Artifact path for a source file.
    pub fn output_path(&self, source: &Path, work_dir: &Path) -> PathBuf {
        let mut name = source.file_stem().unwrap_or_default().to_os_string();
        name.push(".pdf");
        work_dir.join(name)
    }

    /// Command-line arguments for one compilation.
    pub fn args(&self, source: &Path, work_dir: &Path) -> Vec<OsString> {
        vec![
            "-interaction=nonstopmode".into(),
            "-output-directory".into(),
            work_dir.into(),
            source.into(),
        ]
    }
}

impl DocumentConverter for LatexConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["tex"]
    }

    fn name(&self) -> &str {
        "latex"
    }

    fn convert(
        &self,
        document: &Document,
        work_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<PathBuf> {
        fs::create_dir_all(work_dir)?;
        let output = self.output_path(&document.source, work_dir);
        if output.exists() {
            fs::remove_file(&output)?;
        }
        let result = run_tool(&options.xelatex, self.args(&document.source, work_dir))?;

        if output.is_file() {
            if !result.status.success() {
                log::warn!("xelatex reported errors for '{}'", document.name);
            }
            return Ok(output);
        }

        Err(Error::ToolFailed {
            tool: options.xelatex.clone(),
            detail: output_tail(&result),
        })
    }
}
