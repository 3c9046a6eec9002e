//! Rendering of book plans to LaTeX and JSON.

mod json;
mod latex;
mod options;

pub use json::{to_json, JsonFormat};
pub use latex::{latex_escape, render_index_latex, render_master_latex};
pub use options::BookOptions;
