use crate::CoreError;
use crate::encoding::{DEFAULT_ENCODING, TextEncoding};
use crate::file_finder::{FileJob, suffixed_output_path};
use crate::formatter::{DEFAULT_STYLE_PROFILE, StyleFormatter};
use crate::stripper::{LexicalSyntax, strip_comments};
use log::{debug, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "py";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_formatted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub remove_comments: bool,
    pub style_profile: String,
    pub encoding: String,
    pub output_suffix: String,
    pub syntax: LexicalSyntax,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            remove_comments: false,
            style_profile: DEFAULT_STYLE_PROFILE.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            syntax: LexicalSyntax::python(),
        }
    }
}

#[derive(Debug)]
pub struct ProcessedFileResult {
    pub path: PathBuf,
    pub output: PathBuf,
    /// The formatter's `changed` flag, or why the file was not written.
    pub outcome: Result<bool, CoreError>,
}

impl ProcessedFileResult {
    pub fn error(&self) -> Option<&CoreError> {
        self.outcome.as_ref().err()
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<ProcessedFileResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ProcessedFileResult> {
        self.results.iter().filter(|r| r.outcome.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ProcessedFileResult> {
        self.results.iter().filter(|r| r.outcome.is_err())
    }

    pub fn changed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, Ok(true)))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

fn io_err(path: &Path, action: &str) -> impl Fn(std::io::Error) -> CoreError {
    let context = format!("{} {}", action, path.display());
    move |source| CoreError::Io {
        context: context.clone(),
        source,
    }
}

pub fn validate_input(path: &Path) -> Result<(), CoreError> {
    if !path.is_file() {
        return Err(CoreError::InvalidInput(format!(
            "'{}' does not exist or is not a file",
            path.display()
        )));
    }
    if path.extension().is_none_or(|x| x != SOURCE_EXTENSION) {
        return Err(CoreError::InvalidInput(format!(
            "'{}' must be a Python file with extension '.{}'",
            path.display(),
            SOURCE_EXTENSION
        )));
    }
    Ok(())
}

/// Strips comments if requested, then runs the formatter. Returns the
/// formatted text and the formatter's `changed` flag.
pub fn format_source(
    source: &str,
    options: &FormatOptions,
    formatter: &dyn StyleFormatter,
) -> Result<(String, bool), CoreError> {
    let stripped;
    let input = if options.remove_comments {
        stripped = strip_comments(source, &options.syntax)?;
        stripped.as_str()
    } else {
        source
    };
    let formatted = formatter.format(input, &options.style_profile)?;
    Ok((formatted.text, formatted.changed))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent, "Failed to create directory"))?;
    }
    fs::write(path, bytes).map_err(io_err(path, "Failed to write"))
}

/// Reads `input`, strips and formats it, and writes the result to `output`
/// (or to the suffixed sibling of `input`). Returns the `changed` flag.
pub fn format_file(
    input: &Path,
    output: Option<&Path>,
    options: &FormatOptions,
    formatter: &dyn StyleFormatter,
) -> Result<bool, CoreError> {
    validate_input(input)?;
    let encoding = TextEncoding::for_label(&options.encoding)?;

    debug!("{}: reading as {}", input.display(), encoding.name());
    let bytes = fs::read(input).map_err(io_err(input, "Failed to read"))?;
    let source = encoding.decode(&bytes)?;

    if options.remove_comments {
        debug!("{}: removing comments", input.display());
    }
    debug!("{}: formatting with style '{}'", input.display(), options.style_profile);
    let (text, changed) = format_source(&source, options, formatter)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| suffixed_output_path(input, &options.output_suffix));
    let encoded = encoding.encode(&text)?;
    write_output(&output, &encoded)?;
    debug!("{}: wrote {} (changed: {})", input.display(), output.display(), changed);
    Ok(changed)
}

/// Processes every job on the rayon pool. A failing file never stops the
/// others; results keep the order of `jobs`.
pub fn process_files(
    jobs: Vec<FileJob>,
    options: &FormatOptions,
    formatter: &dyn StyleFormatter,
) -> BatchReport {
    info!("processing {} files", jobs.len());
    let results: Vec<ProcessedFileResult> = jobs
        .into_par_iter()
        .map(|job| {
            let output = job
                .output
                .unwrap_or_else(|| suffixed_output_path(&job.input, &options.output_suffix));
            let outcome = format_file(&job.input, Some(output.as_path()), options, formatter);
            // Failures are surfaced through the report, not the log.
            if let Err(e) = &outcome {
                debug!("{}: failed: {}", job.input.display(), e);
            }
            ProcessedFileResult {
                path: job.input,
                output,
                outcome,
            }
        })
        .collect();
    let report = BatchReport { results };
    info!(
        "done: {} changed, {} failed",
        report.changed_count(),
        report.failed().count()
    );
    report
}
