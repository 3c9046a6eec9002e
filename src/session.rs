//! End-to-end merge runs.
//!
//! A [`MergeSession`] scans the input folder, converts every document to a
//! PDF artifact, recovers outlines, builds the keyword index and its page,
//! assembles the TOC and compiles the master document.
//!
//! # Example
//!
//! ```no_run
//! use bookmerge::session::{MergeOptions, MergeSession};
//!
//! fn main() -> bookmerge::Result<()> {
//!     let options = MergeOptions::new()
//!         .with_input_dir("chapters")
//!         .with_output_name("Team_Handbook");
//!
//!     let report = MergeSession::new(options).run()?;
//!     if let Some(pdf) = report.output {
//!         println!("{}", pdf.display());
//!     }
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{PageSource, PdfArtifact};
use crate::convert::{ConvertOptions, ConverterRegistry};
use crate::detect::SourceFormat;
use crate::error::{Error, Result};
use crate::index::{IndexOptions, IndexOutcome, KeywordIndexer, SkipReason};
use crate::model::{Document, KeywordIndex};
use crate::outline::normalize_source;
use crate::plan::{BookPlan, IndexPage, PlannedChapter};
use crate::render::{render_index_latex, render_master_latex, to_json, BookOptions, JsonFormat};
use crate::toc::Chapter;
use crate::typeset::{publish, Typesetter, INDEX_PASSES, MASTER_PASSES};

/// Output name used when none is given.
pub const DEFAULT_OUTPUT_NAME: &str = "FINAL_MERGED_DOCUMENT";

/// Options for a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Folder holding the source documents
    pub input_dir: PathBuf,

    /// Folder receiving the final PDF
    pub output_dir: PathBuf,

    /// Folder for converted artifacts and generated LaTeX
    pub work_dir: PathBuf,

    /// Keyword list file
    pub keyword_file: PathBuf,

    /// Book title (defaults to the output name with underscores as spaces)
    pub title: Option<String>,

    /// Final PDF name, `.pdf` appended when missing
    pub output_name: String,

    /// Write the assembled plan as JSON to this path
    pub plan_file: Option<PathBuf>,

    /// Run the typesetter; when false only LaTeX sources are written
    pub compile: bool,

    /// Keyword indexing options
    pub index: IndexOptions,

    /// Master document layout
    pub book: BookOptions,

    /// Source conversion settings
    pub convert: ConvertOptions,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            work_dir: PathBuf::from("converted"),
            keyword_file: PathBuf::from("keywords.txt"),
            title: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            plan_file: None,
            compile: true,
            index: IndexOptions::default(),
            book: BookOptions::default(),
            convert: ConvertOptions::default(),
        }
    }
}

impl MergeOptions {
    /// Create merge options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input folder.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output folder.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the work folder.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Set the keyword file.
    pub fn with_keyword_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.keyword_file = path.into();
        self
    }

    /// Set the book title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the final PDF name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Write the plan as JSON.
    pub fn with_plan_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.plan_file = Some(path.into());
        self
    }

    /// Enable or disable typesetting.
    pub fn with_compile(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    /// Set indexing options.
    pub fn with_index_options(mut self, options: IndexOptions) -> Self {
        self.index = options;
        self
    }

    /// Set layout options.
    pub fn with_book_options(mut self, options: BookOptions) -> Self {
        self.book = options;
        self
    }

    /// Set conversion options.
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }

    /// Title shown on the title page.
    pub fn book_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.output_name.replace('_', " "))
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum MergeEvent<'a> {
    /// The input folder was scanned.
    Scanned {
        /// Number of supported documents
        count: usize,
    },

    /// A document is about to be converted.
    Converting {
        /// The document
        document: &'a Document,
    },

    /// A document now has an artifact.
    Converted {
        /// The document
        document: &'a Document,
    },

    /// A document was left out of the book.
    Excluded {
        /// The document
        document: &'a Document,
        /// Why it was excluded
        error: &'a Error,
    },

    /// Keyword indexing finished.
    Indexed {
        /// Keywords found at least once
        keywords: usize,
    },

    /// Keyword indexing did not run.
    IndexSkipped(SkipReason),

    /// The typesetter is running on a generated source.
    Compiling {
        /// Generated LaTeX file
        tex: &'a Path,
    },
}

/// A document that did not make it into the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Display name
    pub name: String,
    /// Error message
    pub reason: String,
}

/// Outcome of a merge run.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Supported documents found in the input folder
    pub documents_found: usize,

    /// Documents included in the book
    pub documents_included: usize,

    /// Documents left out of the book
    pub failures: Vec<DocumentFailure>,

    /// Number of TOC directives
    pub directives: usize,

    /// Keywords with at least one page
    pub keywords_indexed: usize,

    /// Set when indexing did not run
    pub index_skipped: Option<SkipReason>,

    /// Generated master LaTeX source
    pub master_tex: Option<PathBuf>,

    /// Final PDF, when compiled
    pub output: Option<PathBuf>,

    /// The assembled plan
    pub plan: Option<BookPlan>,
}

impl MergeReport {
    /// Whether the input folder held no supported documents.
    pub fn is_empty(&self) -> bool {
        self.documents_found == 0
    }
}

/// List supported documents in `input_dir`, sorted by path.
///
/// Ordinals start at 1. A missing folder yields no documents.
pub fn scan_documents(input_dir: &Path) -> Result<Vec<Document>> {
    if !input_dir.is_dir() {
        log::warn!("Input folder {} does not exist", input_dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && SourceFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .filter_map(|(i, path)| {
            let format = SourceFormat::from_path(&path)?;
            Some(Document::new(path, format, i + 1))
        })
        .collect())
}

/// A document with an opened artifact.
struct Loaded<'d> {
    document: &'d Document,
    artifact: PdfArtifact,
    page_count: u32,
}

/// Drives one merge run.
pub struct MergeSession {
    options: MergeOptions,
    registry: ConverterRegistry,
    typesetter: Typesetter,
}

impl MergeSession {
    /// Create a session with the built-in converters.
    pub fn new(options: MergeOptions) -> Self {
        let typesetter = Typesetter::with_program(options.convert.xelatex.clone());
        Self {
            options,
            registry: ConverterRegistry::with_defaults(),
            typesetter,
        }
    }

    /// Use a custom converter registry.
    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a custom typesetter.
    pub fn with_typesetter(mut self, typesetter: Typesetter) -> Self {
        self.typesetter = typesetter;
        self
    }

    /// Session options.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Scan the input folder.
    pub fn scan(&self) -> Result<Vec<Document>> {
        scan_documents(&self.options.input_dir)
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<MergeReport> {
        self.run_with(|_| {})
    }

    /// Run the whole pipeline, reporting progress to `on_event`.
    pub fn run_with<F>(&self, mut on_event: F) -> Result<MergeReport>
    where
        F: FnMut(MergeEvent<'_>),
    {
        let mut documents = self.scan()?;
        on_event(MergeEvent::Scanned {
            count: documents.len(),
        });

        let mut report = MergeReport {
            documents_found: documents.len(),
            ..MergeReport::default()
        };
        if documents.is_empty() {
            return Ok(report);
        }

        fs::create_dir_all(&self.options.work_dir)?;
        fs::create_dir_all(&self.options.output_dir)?;

        self.convert_all(&mut documents, &mut report, &mut on_event);
        let loaded = self.load_all(&documents, &mut report, &mut on_event);
        report.documents_included = loaded.len();
        log::info!(
            "{} of {} documents included",
            report.documents_included,
            report.documents_found
        );

        let keywords = self.build_index(&loaded, &mut report, &mut on_event)?;

        let chapters: Vec<PlannedChapter> = loaded
            .iter()
            .map(|l| {
                let outline = normalize_source(&l.artifact);
                let chapter = Chapter::new(
                    l.document.ordinal,
                    l.document.name.clone(),
                    l.page_count,
                    outline,
                );
                PlannedChapter::new(chapter, artifact_path(l.document))
            })
            .collect();

        let mut plan = BookPlan::new(self.options.book_title(), chapters);
        if !keywords.is_empty() && self.options.compile {
            if let Some(page) = self.compile_index(&keywords, &mut on_event) {
                plan = plan.with_index_page(page);
            }
        }
        let plan = plan.with_keywords(keywords);
        report.directives = plan.toc.len();

        let master = self.options.work_dir.join("master.tex");
        fs::write(&master, render_master_latex(&plan, &self.options.book))?;
        report.master_tex = Some(master.clone());

        if let Some(path) = &self.options.plan_file {
            fs::write(path, to_json(&plan, JsonFormat::Pretty)?)?;
            log::info!("Wrote plan to {}", path.display());
        }

        if self.options.compile {
            on_event(MergeEvent::Compiling {
                tex: master.as_path(),
            });
            let compiled =
                self.typesetter
                    .compile(&master, &self.options.output_dir, MASTER_PASSES)?;
            let output = publish(
                &compiled,
                &self.options.output_dir,
                &self.options.output_name,
            )?;
            log::info!("Final document: {}", output.display());
            report.output = Some(output);
        }

        report.plan = Some(plan);
        Ok(report)
    }

    fn convert_all<F>(&self, documents: &mut [Document], report: &mut MergeReport, on_event: &mut F)
    where
        F: FnMut(MergeEvent<'_>),
    {
        for document in documents.iter_mut() {
            on_event(MergeEvent::Converting {
                document: &*document,
            });
            match self
                .registry
                .convert(document, &self.options.work_dir, &self.options.convert)
            {
                Ok(artifact) => {
                    let artifact = fs::canonicalize(&artifact).unwrap_or(artifact);
                    document.attach_artifact(artifact);
                    on_event(MergeEvent::Converted {
                        document: &*document,
                    });
                }
                Err(error) => {
                    log::warn!("Failed to convert '{}': {}", document.name, error);
                    exclude(report, document, &error, on_event);
                }
            }
        }
    }

    fn load_all<'d, F>(
        &self,
        documents: &'d [Document],
        report: &mut MergeReport,
        on_event: &mut F,
    ) -> Vec<Loaded<'d>>
    where
        F: FnMut(MergeEvent<'_>),
    {
        documents
            .iter()
            .filter(|d| d.has_artifact())
            .filter_map(|document| match load(document) {
                Ok(loaded) => Some(loaded),
                Err(error) => {
                    log::warn!("Could not read artifact of '{}': {}", document.name, error);
                    exclude(report, document, &error, on_event);
                    None
                }
            })
            .collect()
    }

    fn build_index<F>(
        &self,
        loaded: &[Loaded<'_>],
        report: &mut MergeReport,
        on_event: &mut F,
    ) -> Result<KeywordIndex>
    where
        F: FnMut(MergeEvent<'_>),
    {
        let indexer = KeywordIndexer::with_options(self.options.index.clone());
        let sources = loaded
            .iter()
            .map(|l| Some(&l.artifact as &dyn PageSource));

        match indexer.index_file(&self.options.keyword_file, sources)? {
            IndexOutcome::Built(index) => {
                report.keywords_indexed = index.len();
                on_event(MergeEvent::Indexed {
                    keywords: index.len(),
                });
                Ok(index)
            }
            IndexOutcome::Skipped(reason) => {
                report.index_skipped = Some(reason);
                on_event(MergeEvent::IndexSkipped(reason));
                Ok(KeywordIndex::new())
            }
        }
    }

    /// Typeset the index page. Failures are logged and leave the book without an index.
    fn compile_index<F>(&self, keywords: &KeywordIndex, on_event: &mut F) -> Option<IndexPage>
    where
        F: FnMut(MergeEvent<'_>),
    {
        let tex = self.options.work_dir.join("index.tex");
        let compiled = fs::write(&tex, render_index_latex(keywords, &self.options.book))
            .map_err(Error::from)
            .and_then(|_| {
                on_event(MergeEvent::Compiling { tex: tex.as_path() });
                self.typesetter
                    .compile(&tex, &self.options.work_dir, INDEX_PASSES)
            })
            .and_then(|pdf| {
                let page_count = PdfArtifact::open(&pdf)?.page_count()?;
                let artifact = fs::canonicalize(&pdf).unwrap_or(pdf);
                Ok(IndexPage {
                    artifact,
                    page_count,
                })
            });

        match compiled {
            Ok(page) => Some(page),
            Err(e) => {
                log::error!("Failed to compile index page: {}", e);
                None
            }
        }
    }
}

fn load(document: &Document) -> Result<Loaded<'_>> {
    let path = document
        .artifact()
        .ok_or_else(|| Error::MissingArtifact(document.name.clone()))?;
    let artifact = PdfArtifact::open(path)?;
    let page_count = artifact.page_count()?;
    Ok(Loaded {
        document,
        artifact,
        page_count,
    })
}

fn artifact_path(document: &Document) -> PathBuf {
    document.artifact().map(Path::to_path_buf).unwrap_or_default()
}

fn exclude<F>(report: &mut MergeReport, document: &Document, error: &Error, on_event: &mut F)
where
    F: FnMut(MergeEvent<'_>),
{
    report.failures.push(DocumentFailure {
        name: document.name.clone(),
        reason: error.to_string(),
    });
    on_event(MergeEvent::Excluded { document, error });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_notes.md", "a_intro.DOCX", "c.txt", "d_appendix.tex", "e.pdf"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let docs = scan_documents(dir.path()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A Intro", "B Notes", "D Appendix", "E"]);
        let ordinals: Vec<_> = docs.iter().map(|d| d.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
        assert_eq!(docs[0].format, SourceFormat::Docx);
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_documents(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_book_title_from_output_name() {
        let options = MergeOptions::new().with_output_name("Team_Handbook_2026");
        assert_eq!(options.book_title(), "Team Handbook 2026");
        let options = options.with_title("Custom");
        assert_eq!(options.book_title(), "Custom");
    }

    #[test]
    fn test_merge_options_defaults() {
        let options = MergeOptions::default();
        assert_eq!(options.input_dir, PathBuf::from("input"));
        assert_eq!(options.output_dir, PathBuf::from("output"));
        assert_eq!(options.work_dir, PathBuf::from("converted"));
        assert_eq!(options.keyword_file, PathBuf::from("keywords.txt"));
        assert_eq!(options.output_name, DEFAULT_OUTPUT_NAME);
        assert!(options.compile);
    }

    #[test]
    fn test_run_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let options = MergeOptions::new()
            .with_input_dir(dir.path().join("input"))
            .with_output_dir(dir.path().join("output"))
            .with_work_dir(dir.path().join("converted"));
        let report = MergeSession::new(options).run().unwrap();
        assert!(report.is_empty());
        assert!(report.output.is_none());
        assert!(!dir.path().join("converted").exists());
    }
}
