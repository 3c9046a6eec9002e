//! Layout options for generated LaTeX.

use std::path::PathBuf;

/// Options for the master document and the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOptions {
    /// Running header text (defaults to the book title)
    pub header_text: Option<String>,

    /// Centred footer text
    pub footer_text: Option<String>,

    /// Image shown left of the footer text
    pub footer_logo: Option<PathBuf>,

    /// Document class options
    pub class_options: String,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            header_text: None,
            footer_text: None,
            footer_logo: None,
            class_options: "12pt,a4paper".to_string(),
        }
    }
}

impl BookOptions {
    /// Create new book options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the running header.
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }

    /// Set the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    /// Set the footer logo image.
    pub fn with_footer_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.footer_logo = Some(path.into());
        self
    }

    /// Set document class options (e.g. "11pt,letterpaper").
    pub fn with_class_options(mut self, options: impl Into<String>) -> Self {
        self.class_options = options.into();
        self
    }
}
