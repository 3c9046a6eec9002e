//! Error types for bookmerge.

use std::io;
use thiserror::Error;

/// Result type alias for bookmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a merged book.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The artifact is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A document has no page-bearing artifact (conversion failed or never ran).
    #[error("No converted artifact for document: {0}")]
    MissingArtifact(String),

    /// The outline (bookmark) structure could not be read.
    #[error("Outline read error: {0}")]
    OutlineRead(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// No converter is registered for the source format.
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),

    /// An external tool could not be spawned or exited unsuccessfully.
    #[error("{tool} failed: {detail}")]
    ToolFailed {
        /// Executable name
        tool: String,
        /// Captured stderr or spawn error
        detail: String,
    },

    /// Error during rendering (LaTeX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
