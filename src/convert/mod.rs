//! Document converters producing page-bearing PDF artifacts.
//!
//! Converters are registered by file extension and dispatched per
//! [`Document`]. Each one turns a source document into a PDF in the work
//! directory, or hands back the source itself when it already is one.
//!
//! # Example
//!
//! ```no_run
//! use bookmerge::convert::{ConvertOptions, ConverterRegistry};
//! use bookmerge::detect::SourceFormat;
//! use bookmerge::model::Document;
//! use std::path::Path;
//!
//! fn main() -> bookmerge::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let doc = Document::new("input/01_intro.docx", SourceFormat::Docx, 1);
//!
//!     let artifact = registry.convert(&doc, Path::new("converted"), &ConvertOptions::default())?;
//!     println!("{}", artifact.display());
//!     Ok(())
//! }
//! ```

mod latex;
mod pandoc;
mod pdf;

pub use latex::LatexConverter;
pub use pandoc::{PandocConverter, HEADER_TEX};
pub use pdf::PdfPassthrough;

use crate::error::{Error, Result};
use crate::model::Document;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

/// Options for converting source documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Pandoc executable
    pub pandoc: String,

    /// XeLaTeX executable, also used as pandoc's PDF engine
    pub xelatex: String,

    /// Main document font
    pub main_font: String,

    /// Monospace font
    pub mono_font: String,

    /// Base font size
    pub font_size: String,

    /// Line spacing factor
    pub line_stretch: f32,

    /// Page margin
    pub margin: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pandoc: "pandoc".to_string(),
            xelatex: "xelatex".to_string(),
            main_font: "Arial".to_string(),
            mono_font: "Courier New".to_string(),
            font_size: "12pt".to_string(),
            line_stretch: 1.5,
            margin: "1in".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pandoc executable.
    pub fn with_pandoc(mut self, program: impl Into<String>) -> Self {
        self.pandoc = program.into();
        self
    }

    /// Set the xelatex executable.
    pub fn with_xelatex(mut self, program: impl Into<String>) -> Self {
        self.xelatex = program.into();
        self
    }

    /// Set main and monospace fonts.
    pub fn with_fonts(mut self, main: impl Into<String>, mono: impl Into<String>) -> Self {
        self.main_font = main.into();
        self.mono_font = mono.into();
        self
    }

    /// Set the base font size (e.g. "11pt").
    pub fn with_font_size(mut self, size: impl Into<String>) -> Self {
        self.font_size = size.into();
        self
    }

    /// Set line spacing.
    pub fn with_line_stretch(mut self, stretch: f32) -> Self {
        self.line_stretch = stretch;
        self
    }

    /// Set the page margin (e.g. "2cm").
    pub fn with_margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = margin.into();
        self
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new source format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Produce a PDF artifact for `document`, writing into `work_dir` if needed.
    fn convert(
        &self,
        document: &Document,
        work_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<PathBuf>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// Maps file extensions to converters and checks that a conversion
/// actually left an artifact behind.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfPassthrough::new()));
        registry.register(Arc::new(PandocConverter::new()));
        registry.register(Arc::new(LatexConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Convert a document with the converter registered for its format.
    pub fn convert(
        &self,
        document: &Document,
        work_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<PathBuf> {
        let ext = document.format.extension();
        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))?;

        log::debug!("Converting '{}' with {}", document.name, converter.name());
        let artifact = converter.convert(document, work_dir, options)?;

        if !artifact.is_file() {
            return Err(Error::MissingArtifact(document.name.clone()));
        }
        Ok(artifact)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Run an external tool to completion, capturing its output.
///
/// Spawn failures become [`Error::ToolFailed`]; the exit status is left to
/// the caller since TeX engines exit non-zero on recoverable warnings.
pub(crate) fn run_tool<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::ToolFailed {
            tool: program.to_string(),
            detail: e.to_string(),
        })
}

/// Last non-empty lines of a tool's output, for error messages.
pub(crate) fn output_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(5)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::SourceFormat;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_fonts("Liberation Serif", "Fira Mono")
            .with_font_size("11pt")
            .with_line_stretch(1.2)
            .with_margin("2cm")
            .with_xelatex("/opt/tex/xelatex");

        assert_eq!(options.main_font, "Liberation Serif");
        assert_eq!(options.mono_font, "Fira Mono");
        assert_eq!(options.font_size, "11pt");
        assert_eq!(options.line_stretch, 1.2);
        assert_eq!(options.margin, "2cm");
        assert_eq!(options.xelatex, "/opt/tex/xelatex");
        assert_eq!(options.pandoc, "pandoc");
    }

    #[test]
    fn test_convert_options_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.main_font, "Arial");
        assert_eq!(options.mono_font, "Courier New");
        assert_eq!(options.font_size, "12pt");
        assert_eq!(options.line_stretch, 1.5);
        assert_eq!(options.margin, "1in");
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        for format in SourceFormat::ALL {
            assert!(registry.supports(format.extension()), "{}", format);
        }
        assert!(registry.supports("PDF"));
        assert!(!registry.supports("odt"));
    }

    #[test]
    fn test_registry_get_by_extension() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.get_by_extension("pdf").unwrap().name(), "pdf");
        assert_eq!(registry.get_by_extension("md").unwrap().name(), "pandoc");
        assert_eq!(registry.get_by_extension("tex").unwrap().name(), "latex");
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.get_by_name("Pandoc").is_some());
        assert!(registry.get_by_name("word").is_none());
    }

    #[test]
    fn test_registry_unsupported_format() {
        let registry = ConverterRegistry::new();
        let doc = Document::new("a.tex", SourceFormat::Tex, 1);
        let dir = tempfile::tempdir().unwrap();
        let err = registry
            .convert(&doc, dir.path(), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "tex"));
    }

    #[test]
    fn test_run_tool_missing_program() {
        let err = run_tool("bookmerge-no-such-tool", ["--version"]).unwrap_err();
        assert!(matches!(err, Error::ToolFailed { tool, .. } if tool == "bookmerge-no-such-tool"));
    }
}
