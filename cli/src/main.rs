//! bookmerge CLI - merge a folder of documents into one book

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use bookmerge::session::{scan_documents, DEFAULT_OUTPUT_NAME};
use bookmerge::{
    index_pdfs, read_outline, BookOptions, IndexOptions, KeywordList, MatchMode, MergeEvent,
    MergeOptions, MergeReport, MergeSession,
};

#[derive(Parser)]
#[command(name = "bookmerge")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Merge documents into one PDF book with a table of contents and keyword index",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    merge: MergeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct MergeArgs {
    /// Name of the final PDF (prompted for when omitted)
    #[arg(short, long, env = "BOOKMERGE_NAME")]
    name: Option<String>,

    /// Folder holding the source documents
    #[arg(short, long, value_name = "DIR", env = "BOOKMERGE_INPUT", default_value = "input")]
    input: PathBuf,

    /// Folder receiving the final PDF
    #[arg(short, long, value_name = "DIR", env = "BOOKMERGE_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Folder for converted artifacts and generated LaTeX
    #[arg(long, value_name = "DIR", env = "BOOKMERGE_WORK_DIR", default_value = "converted")]
    work_dir: PathBuf,

    /// Keyword list (comma or newline separated)
    #[arg(short, long, value_name = "FILE", env = "BOOKMERGE_KEYWORDS", default_value = "keywords.txt")]
    keywords: PathBuf,

    /// Book title (defaults to the name with underscores as spaces)
    #[arg(short, long)]
    title: Option<String>,

    /// Running header text
    #[arg(long)]
    header: Option<String>,

    /// Footer text
    #[arg(long)]
    footer: Option<String>,

    /// Footer logo image
    #[arg(long, value_name = "FILE", env = "BOOKMERGE_LOGO")]
    logo: Option<PathBuf>,

    /// Match keywords as whole words only
    #[arg(long)]
    whole_word: bool,

    /// Scan pages for keywords in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the assembled plan as JSON
    #[arg(long, value_name = "FILE", env = "BOOKMERGE_PLAN")]
    plan: Option<PathBuf>,

    /// Write LaTeX sources without running xelatex
    #[arg(long)]
    no_compile: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized outline of a PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Build a keyword index across PDFs, in the given order
    Index {
        /// Keyword list (comma or newline separated)
        #[arg(short, long, value_name = "FILE")]
        keywords: PathBuf,

        /// Match keywords as whole words only
        #[arg(long)]
        whole_word: bool,

        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline { input }) => cmd_outline(&input),
        Some(Commands::Index {
            keywords,
            whole_word,
            inputs,
        }) => cmd_index(&keywords, whole_word, &inputs),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_merge(cli.merge),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn match_mode(whole_word: bool) -> MatchMode {
    if whole_word {
        MatchMode::WholeWord
    } else {
        MatchMode::Substring
    }
}

fn merge_options(args: &MergeArgs, name: String) -> MergeOptions {
    let mut book = BookOptions::new();
    if let Some(header) = &args.header {
        book = book.with_header(header);
    }
    if let Some(footer) = &args.footer {
        book = book.with_footer(footer);
    }
    if let Some(logo) = &args.logo {
        book = book.with_footer_logo(logo);
    }

    let mut options = MergeOptions::new()
        .with_input_dir(&args.input)
        .with_output_dir(&args.output)
        .with_work_dir(&args.work_dir)
        .with_keyword_file(&args.keywords)
        .with_output_name(name)
        .with_compile(!args.no_compile)
        .with_book_options(book)
        .with_index_options(
            IndexOptions::new()
                .with_match_mode(match_mode(args.whole_word))
                .with_parallel(args.parallel),
        );
    if let Some(title) = &args.title {
        options = options.with_title(title);
    }
    if let Some(plan) = &args.plan {
        options = options.with_plan_file(plan);
    }
    options
}

/// An empty answer selects the default name.
fn resolve_name(answer: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        DEFAULT_OUTPUT_NAME.to_string()
    } else {
        answer.to_string()
    }
}

fn prompt_name() -> io::Result<String> {
    println!("{}", "─".repeat(50).dimmed());
    print!(
        "Enter name for final PDF (default: {}): ",
        DEFAULT_OUTPUT_NAME
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    println!("{}", "─".repeat(50).dimmed());
    Ok(resolve_name(&answer))
}

fn cmd_merge(args: MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Scanning documents...".cyan());
    let documents = scan_documents(&args.input)?;
    if documents.is_empty() {
        println!(
            "{} No documents in {}",
            "✗".red(),
            args.input.display()
        );
        println!(
            "  Put your PDF/DOCX/DOC/TEX/MD files in {} first",
            args.input.display()
        );
        return Ok(());
    }
    println!("Found {} documents to merge", documents.len());

    let name = match &args.name {
        Some(name) => {
            println!("Output name: {}", name.bold());
            name.clone()
        }
        None => prompt_name()?,
    };

    let session = MergeSession::new(merge_options(&args, name));

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = session.run_with(|event| match event {
        MergeEvent::Scanned { count } => pb.set_length(count as u64),
        MergeEvent::Converting { document } => {
            pb.set_message(format!("Converting {}", document.name))
        }
        MergeEvent::Converted { document } => {
            pb.inc(1);
            pb.println(format!("{} Converted: {}", "✓".green(), document.name));
        }
        MergeEvent::Excluded { document, error } => {
            if !document.has_artifact() {
                pb.inc(1);
            }
            pb.println(format!(
                "{} Left out {}: {}",
                "✗".red(),
                document.name,
                error
            ));
        }
        MergeEvent::Indexed { keywords } => {
            pb.println(format!("{} Indexed {} keywords", "✓".green(), keywords))
        }
        MergeEvent::IndexSkipped(reason) => {
            pb.println(format!("{} Index skipped: {}", "ℹ".blue(), reason))
        }
        MergeEvent::Compiling { tex } => pb.set_message(format!(
            "Compiling {}",
            tex.file_name().unwrap_or_default().to_string_lossy()
        )),
    });
    pb.finish_and_clear();

    print_report(&report?);
    Ok(())
}

fn print_report(report: &MergeReport) {
    println!();
    println!("{}", "Merge Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents found".bold(), report.documents_found);
    println!("{}: {}", "Documents included".bold(), report.documents_included);
    println!("{}: {}", "TOC entries".bold(), report.directives);
    println!("{}: {}", "Indexed keywords".bold(), report.keywords_indexed);

    for failure in &report.failures {
        println!("  {} {}: {}", "✗".red(), failure.name, failure.reason.dimmed());
    }

    if let Some(tex) = &report.master_tex {
        println!("{}: {}", "Master source".bold(), tex.display());
    }
    match &report.output {
        Some(pdf) => println!("\n{} {}", "✓ SUCCESS!".green().bold(), pdf.display()),
        None => println!("\n{}", "LaTeX written, compilation skipped".yellow()),
    }
}

fn cmd_outline(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let outline = read_outline(input)?;

    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    match &outline.chapter_title {
        Some(title) => println!("{}: {}", "Chapter".bold(), title),
        None => println!("{}: {}", "Chapter".bold(), "(not found)".dimmed()),
    }

    if outline.nodes.is_empty() {
        println!("{}", "No numbered sections".dimmed());
        return Ok(());
    }

    println!();
    for node in &outline.nodes {
        let indent = "  ".repeat(node.depth() as usize);
        println!(
            "{}{} {} {}",
            indent,
            node.title,
            "p.".dimmed(),
            node.page.to_string().dimmed()
        );
    }
    Ok(())
}

fn cmd_index(
    keywords: &Path,
    whole_word: bool,
    inputs: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    if !keywords.exists() {
        println!("{} No {} found", "ℹ".blue(), keywords.display());
        return Ok(());
    }
    let list = KeywordList::from_file(keywords)?;
    if list.is_empty() {
        println!("{} Keyword file is empty", "⚠".yellow());
        return Ok(());
    }

    let options = IndexOptions::new().with_match_mode(match_mode(whole_word));
    let index = index_pdfs(&list, inputs, options);

    println!("{}", "Keyword Index".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (keyword, pages) in index.sorted_entries() {
        let pages: Vec<String> = pages.iter().map(u32::to_string).collect();
        println!("{}: {}", keyword.bold(), pages.join(", "));
    }
    println!();
    println!("Found {} of {} keywords", index.len(), list.len());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "bookmerge".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document merger with table of contents and keyword index");
    println!();
    println!("License: MIT");
}
