//! LaTeX rendering for the index page and the master document.

use std::fmt::Write as _;
use std::path::Path;

use crate::model::{KeywordIndex, TocDirective};
use crate::plan::BookPlan;

use super::BookOptions;

/// Render the standalone keyword index page.
///
/// Keywords are listed case-insensitively sorted in two columns, each
/// followed by its comma-separated global pages.
pub fn render_index_latex(index: &KeywordIndex, options: &BookOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\documentclass[{}]{{article}}", options.class_options);
    out.push_str(
        "\\usepackage[margin=1in]{geometry}\n\
         \\usepackage{multicol}\n\
         \\usepackage{hyperref}\n\
         \\usepackage{fancyhdr}\n\
         \\usepackage{graphicx}\n\n",
    );
    push_page_style(&mut out, "Index", options);
    out.push_str("\\title{\\textbf{Index}}\n\\date{}\n\n");
    out.push_str("\\begin{document}\n\\section*{Index}\n\\begin{multicols}{2}\n\\begin{description}\n");

    for (keyword, pages) in index.sorted_entries() {
        let pages: Vec<String> = pages.iter().map(u32::to_string).collect();
        let _ = writeln!(
            out,
            "    \\item[{{{}}}] {}",
            latex_escape(keyword),
            pages.join(", ")
        );
    }

    out.push_str("\\end{description}\n\\end{multicols}\n\\end{document}\n");
    out
}

/// Render the master document that stitches every artifact together.
///
/// Each included PDF carries its own TOC directives. The include command
/// counts pages from the start of the included file, so directives are
/// written with their local page.
pub fn render_master_latex(plan: &BookPlan, options: &BookOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\documentclass[{}]{{book}}", options.class_options);
    out.push_str(
        "\\usepackage{fontspec}\n\
         \\usepackage[margin=1in]{geometry}\n\
         \\usepackage{pdfpages}\n\
         \\usepackage{hyperref}\n\
         \\usepackage{bookmark}\n\
         \\usepackage{fancyhdr}\n\
         \\usepackage{graphicx}\n\
         \\usepackage{newunicodechar}\n\n\
         \\hypersetup{\n    colorlinks=true,\n    linkcolor=blue,\n}\n\n",
    );

    let header = options.header_text.as_deref().unwrap_or(&plan.title);
    push_page_style(&mut out, header, options);

    let _ = writeln!(out, "\\title{{\\textbf{{{}}}}}", latex_escape(&plan.title));
    out.push_str("\\date{\\today}\n\n");
    out.push_str("\\begin{document}\n\\maketitle\n\\tableofcontents\n\\newpage\n");

    for planned in &plan.chapters {
        let directives: Vec<&TocDirective> =
            plan.directives_for(Some(planned.chapter.ordinal)).collect();
        push_include(&mut out, &planned.artifact, &directives);
    }

    if let Some(index_page) = &plan.index_page {
        let directives: Vec<&TocDirective> = plan.directives_for(None).collect();
        push_include(&mut out, &index_page.artifact, &directives);
    }

    out.push_str("\\end{document}\n");
    out
}

fn push_page_style(out: &mut String, header: &str, options: &BookOptions) {
    out.push_str("\\pagestyle{fancy}\n\\fancyhf{}\n");
    let _ = writeln!(out, "\\lhead{{\\textbf{{{}}}}}", latex_escape(header));
    out.push_str("\\rhead{\\thepage}\n");

    let mut footer = Vec::new();
    if let Some(logo) = &options.footer_logo {
        footer.push(format!("\\includegraphics[height=0.8cm]{{{}}}", latex_path(logo)));
    }
    if let Some(text) = &options.footer_text {
        footer.push(format!("\\textbf{{{}}}", latex_escape(text)));
    }
    if !footer.is_empty() {
        let _ = writeln!(out, "\\cfoot{{{}}}", footer.join(" \\hspace{10pt} "));
    }
    out.push('\n');
}

fn push_include(out: &mut String, artifact: &Path, directives: &[&TocDirective]) {
    let entries: Vec<String> = directives.iter().map(|d| addtotoc_entry(d)).collect();
    let _ = writeln!(
        out,
        "\n\\includepdf[pages=-, pagecommand={{}}, addtotoc={{{}}}]{{{}}}",
        entries.join(", "),
        latex_path(artifact)
    );
}

/// One `addtotoc` tuple, addressed by local page.
fn addtotoc_entry(directive: &TocDirective) -> String {
    format!(
        "{},{},{},{},{}",
        directive.local_page,
        directive.level,
        directive.depth(),
        latex_escape(&directive.title),
        directive.label
    )
}

/// Forward-slash path for TeX.
fn latex_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Escape TeX special characters and map common typographic punctuation.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\~{}"),
            '\u{2014}' => out.push_str("---"),
            '\u{2013}' => out.push_str("--"),
            '\u{201C}' => out.push_str("``"),
            '\u{201D}' => out.push_str("''"),
            '\u{2018}' => out.push('`'),
            '\u{2019}' => out.push('\''),
            _ => out.push(c),
        }
    }
    out
}
