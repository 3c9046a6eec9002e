//! Source format detection and artifact validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Format of an input document, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Already a PDF; used as its own artifact
    Pdf,
    /// Word 2007+ document
    Docx,
    /// Legacy Word document
    Doc,
    /// LaTeX source
    Tex,
    /// Markdown
    Markdown,
}

impl SourceFormat {
    /// All formats accepted in the input folder.
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Pdf,
        SourceFormat::Docx,
        SourceFormat::Doc,
        SourceFormat::Tex,
        SourceFormat::Markdown,
    ];

    /// Resolve a format from an extension (case-insensitive, with or without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            "doc" => Some(SourceFormat::Doc),
            "tex" => Some(SourceFormat::Tex),
            "md" => Some(SourceFormat::Markdown),
            _ => None,
        }
    }

    /// Resolve a format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical lowercase extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
            SourceFormat::Doc => "doc",
            SourceFormat::Tex => "tex",
            SourceFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the header of a converted artifact and return its PDF version.
///
/// Conversion tools occasionally leave a log or partial file behind under
/// the expected name, so artifacts are checked before they are loaded.
pub fn detect_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    detect_pdf_version_from_bytes(&header[..read])
}

/// Return the PDF version from the leading bytes of a file.
pub fn detect_pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a readable PDF artifact.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_pdf_version(path).is_ok()
}
