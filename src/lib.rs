//! # bookmerge
//!
//! Merge a folder of documents into one book with a table of contents and
//! a keyword index.
//!
//! Every input document is converted to a PDF artifact. Its bookmark tree is
//! reduced to a chapter title plus numbered section and subsection headings,
//! local pages are translated into the merged page sequence, and a keyword
//! list is matched against every page. The result is a LaTeX master document
//! that includes each artifact and carries the TOC directives.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookmerge::{merge, MergeOptions};
//!
//! fn main() -> bookmerge::Result<()> {
//!     let report = merge(MergeOptions::new().with_output_name("Handbook"))?;
//!     println!("{} chapters, {} TOC entries", report.documents_included, report.directives);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline recovery**: chapter titles from bookmarks or the first page
//! - **Global pagination**: local pages mapped across the merge sequence
//! - **Keyword index**: substring or whole-word matching, optionally parallel
//! - **Pluggable conversion**: PDF, Word, Markdown and LaTeX sources
//! - **Plan export**: the assembled book as JSON

pub mod artifact;
pub mod convert;
pub mod detect;
pub mod error;
pub mod index;
pub mod model;
pub mod outline;
pub mod pagination;
pub mod plan;
pub mod render;
pub mod session;
pub mod toc;
pub mod typeset;

// Re-export commonly used types
pub use artifact::{MemoryArtifact, PageSource, PdfArtifact};
pub use convert::{ConvertOptions, ConverterRegistry, DocumentConverter};
pub use detect::{is_pdf, SourceFormat};
pub use error::{Error, Result};
pub use index::{IndexOptions, IndexOutcome, KeywordIndexer, KeywordList, MatchMode, SkipReason};
pub use model::{
    Document, HeadingLevel, KeywordIndex, NormalizedOutline, Outline, OutlineItem, OutlineNode,
    TocDirective,
};
pub use outline::OutlineNormalizer;
pub use pagination::{PageCursor, PageSpan};
pub use plan::{BookPlan, IndexPage, PlannedChapter};
pub use render::{BookOptions, JsonFormat};
pub use session::{MergeEvent, MergeOptions, MergeReport, MergeSession};
pub use toc::{assemble, Chapter};

use std::path::Path;

/// Run a complete merge.
pub fn merge(options: MergeOptions) -> Result<MergeReport> {
    MergeSession::new(options).run()
}

/// Normalize the outline of a PDF artifact.
///
/// # Example
///
/// ```no_run
/// let outline = bookmerge::read_outline("converted/Intro.pdf").unwrap();
/// for node in &outline.nodes {
///     println!("{:>3} {} {}", node.page, node.level, node.title);
/// }
/// ```
pub fn read_outline<P: AsRef<Path>>(path: P) -> Result<NormalizedOutline> {
    let artifact = PdfArtifact::open(path)?;
    Ok(outline::normalize_source(&artifact))
}

/// Index PDF artifacts in the given order.
///
/// Artifacts that cannot be opened are logged and occupy no pages.
///
/// # Example
///
/// ```no_run
/// use bookmerge::{index_pdfs, IndexOptions, KeywordList};
///
/// let keywords = KeywordList::parse("pipeline, schema");
/// let index = index_pdfs(&keywords, &["a.pdf", "b.pdf"], IndexOptions::default());
/// println!("{:?}", index.pages("pipeline"));
/// ```
pub fn index_pdfs<P: AsRef<Path>>(
    keywords: &KeywordList,
    paths: &[P],
    options: IndexOptions,
) -> KeywordIndex {
    let artifacts: Vec<Option<PdfArtifact>> = paths
        .iter()
        .map(|path| match PdfArtifact::open(path) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.as_ref().display(), e);
                None
            }
        })
        .collect();

    let sources = artifacts
        .iter()
        .map(|a| a.as_ref().map(|a| a as &dyn PageSource));
    KeywordIndexer::with_options(options).index(keywords, sources)
}
