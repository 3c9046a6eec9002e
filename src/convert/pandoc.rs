//! Pandoc-based converter for word-processor and Markdown sources.

use crate::error::{Error, Result};
use crate::model::Document;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{output_tail, run_tool, ConvertOptions, DocumentConverter};

/// LaTeX header included in every pandoc conversion.
///
/// Centres floats and widens the spacing around them.
pub const HEADER_TEX: &str = r"\usepackage{newunicodechar}

% Center all figures
\makeatletter
\g@addto@macro\@floatboxreset\centering
\makeatother

% Increase spacing around figures
\setlength{\intextsep}{25pt plus 5pt minus 5pt}
\setlength{\textfloatsep}{25pt plus 5pt minus 5pt}
";

const HEADER_FILE: &str = "header.tex";

/// Converts `.docx`, `.doc` and `.md` sources through pandoc and xelatex.
///
/// The artifact is written to `<work_dir>/<display name>.pdf`.
#[derive(Debug, Clone, Default)]
pub struct PandocConverter {
    _private: (),
}

impl PandocConverter {
    /// Create a new pandoc converter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Artifact path for a document.
    pub fn output_path(&self, document: &Document, work_dir: &Path) -> PathBuf {
        work_dir.join(format!("{}.pdf", document.name))
    }

    /// Write the shared header include and return its path.
    pub fn write_header(&self, work_dir: &Path) -> Result<PathBuf> {
        let path = work_dir.join(HEADER_FILE);
        fs::write(&path, HEADER_TEX)?;
        Ok(path)
    }

    /// Command-line arguments for one conversion.
    pub fn args(
        &self,
        source: &Path,
        output: &Path,
        header: &Path,
        options: &ConvertOptions,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            source.into(),
            "-o".into(),
            output.into(),
            format!("--pdf-engine={}", options.xelatex).into(),
        ];
        let vars = [
            format!("mainfont={}", options.main_font),
            format!("monofont={}", options.mono_font),
            format!("fontsize={}", options.font_size),
            format!("linestretch={}", options.line_stretch),
            "pagestyle=empty".to_string(),
        ];
        for var in vars {
            args.push("-V".into());
            args.push(var.into());
        }
        args.push("-H".into());
        args.push(header.into());
        args.push("-V".into());
        args.push(format!("geometry:margin={}", options.margin).into());
        args
    }
}

impl DocumentConverter for PandocConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx", "doc", "md"]
    }

    fn name(&self) -> &str {
        "pandoc"
    }

    fn convert(
        &self,
        document: &Document,
        work_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<PathBuf> {
        fs::create_dir_all(work_dir)?;
        let header = self.write_header(work_dir)?;
        let output = self.output_path(document, work_dir);

        let result = run_tool(
            &options.pandoc,
            self.args(&document.source, &output, &header, options),
        )?;

        if !result.status.success() {
            return Err(Error::ToolFailed {
                tool: options.pandoc.clone(),
                detail: output_tail(&result),
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::SourceFormat;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_output_path_uses_display_name() {
        let doc = Document::new("input/03_data_pipeline.docx", SourceFormat::Docx, 3);
        let path = PandocConverter::new().output_path(&doc, Path::new("converted"));
        assert_eq!(path, Path::new("converted").join("03 Data Pipeline.pdf"));
    }

    #[test]
    fn test_args() {
        let converter = PandocConverter::new();
        let args = converter.args(
            Path::new("in.md"),
            Path::new("out.pdf"),
            Path::new("header.tex"),
            &ConvertOptions::default(),
        );
        assert_eq!(
            strings(&args),
            vec![
                "in.md",
                "-o",
                "out.pdf",
                "--pdf-engine=xelatex",
                "-V",
                "mainfont=Arial",
                "-V",
                "monofont=Courier New",
                "-V",
                "fontsize=12pt",
                "-V",
                "linestretch=1.5",
                "-V",
                "pagestyle=empty",
                "-H",
                "header.tex",
                "-V",
                "geometry:margin=1in",
            ]
        );
    }

    #[test]
    fn test_write_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = PandocConverter::new().write_header(dir.path()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains(r"\g@addto@macro\@floatboxreset\centering"));
        assert!(content.contains(r"\textfloatsep"));
    }

    #[test]
    fn test_missing_pandoc_fails() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::new(dir.path().join("notes.md"), SourceFormat::Markdown, 1);
        let options = ConvertOptions::default().with_pandoc("bookmerge-missing-pandoc");
        let err = PandocConverter::new()
            .convert(&doc, dir.path(), &options)
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
    }
}
