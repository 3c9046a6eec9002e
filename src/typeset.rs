//! LaTeX compilation of the index page and the master document.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{output_tail, run_tool};
use crate::error::{Error, Result};

/// Passes needed for the master document so the TOC resolves.
pub const MASTER_PASSES: u32 = 2;

/// Passes needed for the standalone index page.
pub const INDEX_PASSES: u32 = 1;

/// Runs xelatex over generated sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typesetter {
    program: String,
}

impl Default for Typesetter {
    fn default() -> Self {
        Self {
            program: "xelatex".to_string(),
        }
    }
}

impl Typesetter {
    /// Create a typesetter using `xelatex` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific xelatex executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this typesetter runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compile `tex` into `out_dir`, running `passes` times (at least once).
    ///
    /// Returns `<out_dir>/<tex stem>.pdf`. Engine warnings are tolerated as
    /// long as the PDF exists after the final pass. A PDF left over from an
    /// earlier run is removed first, so it never counts as output.
    pub fn compile(&self, tex: &Path, out_dir: &Path, passes: u32) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)?;
        let pdf = compiled_path(tex, out_dir);
        if pdf.exists() {
            log::debug!("Removing stale {}", pdf.display());
            fs::remove_file(&pdf)?;
        }
        let passes = passes.max(1);
        let mut last = None;

        for pass in 1..=passes {
            log::debug!("{} pass {}/{} on {}", self.program, pass, passes, tex.display());
            let output = run_tool(
                &self.program,
                [
                    OsStr::new("-interaction=nonstopmode"),
                    OsStr::new("-output-directory"),
                    out_dir.as_os_str(),
                    tex.as_os_str(),
                ],
            )?;
            last = Some(output);
        }

        if pdf.is_file() {
            return Ok(pdf);
        }

        let detail = last
            .map(|output| output_tail(&output))
            .unwrap_or_default();
        let log_file = pdf.with_extension("log");
        Err(Error::ToolFailed {
            tool: self.program.clone(),
            detail: format!("no PDF produced, see {}\n{}", log_file.display(), detail),
        })
    }
}

/// PDF path xelatex writes for `tex` in `out_dir`.
fn compiled_path(tex: &Path, out_dir: &Path) -> PathBuf {
    let mut name = tex.file_stem().unwrap_or_default().to_os_string();
    name.push(".pdf");
    out_dir.join(name)
}

/// Final file name for a user-supplied output name, `.pdf` appended when missing.
pub fn output_file_name(name: &str) -> String {
    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}

/// Move a compiled PDF to `<out_dir>/<name>.pdf`, replacing any existing file.
pub fn publish(compiled: &Path, out_dir: &Path, name: &str) -> Result<PathBuf> {
    let target = out_dir.join(output_file_name(name));
    if target == compiled {
        return Ok(target);
    }
    if target.exists() {
        fs::remove_file(&target)?;
    }
    fs::rename(compiled, &target)?;
    Ok(target)
}
