//! Data model for a merge run.
//!
//! These types are shared by the outline normalizer, the keyword indexer,
//! the TOC assembler and the renderers. They carry no behavior beyond
//! simple accessors and are all serializable.

mod document;
mod index;
mod outline;
mod toc;

pub use document::{display_name, Document};
pub use index::KeywordIndex;
pub use outline::{HeadingLevel, NormalizedOutline, Outline, OutlineItem, OutlineNode, Preorder};
pub use toc::TocDirective;
