use crate::command_runner::YAPF;
use crate::encoding::DEFAULT_ENCODING;
use crate::formatter::DEFAULT_STYLE_PROFILE;
use crate::processor::{DEFAULT_OUTPUT_SUFFIX, FormatOptions, SOURCE_EXTENSION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use log::{debug, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    about = "Python reformatter with optional comment removal (main arguments)",
    long_about = "These are the main arguments for reformatting Python files."
)]
pub struct PyreformatArgs {
    #[clap(
        short = 'i',
        long = "in-file",
        value_name = "PATH",
        required_unless_present = "check_dependencies",
        help = "Python file to format, or a directory whose '*.py' files are collected recursively"
    )]
    pub in_file: Option<PathBuf>,

    #[clap(
        short = 'o',
        long = "out-file",
        value_name = "PATH",
        help = "Output file. For a directory input this is the output root; the subdirectory structure of the input is kept. Missing directories are created"
    )]
    pub out_file: Option<PathBuf>,

    #[clap(
        short = 'e',
        long,
        default_value = DEFAULT_ENCODING,
        help = "Encoding for all input and output files: a Python codec name (utf-8, utf-8-sig, latin-1, ascii) or a WHATWG label (cp1252, shift_jis, utf-16le, ...)"
    )]
    pub encoding: String,

    #[clap(
        short = 's',
        long = "out-file-suffix",
        default_value = DEFAULT_OUTPUT_SUFFIX,
        help = "Suffix inserted before '.py' when no output path is given"
    )]
    pub out_file_suffix: String,

    #[clap(
        long = "style-config",
        visible_alias = "style",
        default_value = DEFAULT_STYLE_PROFILE,
        help = "YAPF style profile used for formatting"
    )]
    pub style_config: String,

    #[clap(
        short = 'r',
        long = "remove-comments",
        overrides_with = "no_remove_comments",
        help = "Remove comments before formatting"
    )]
    pub remove_comments: bool,

    #[clap(long = "no-remove-comments", overrides_with = "remove_comments", help = "Keep comments [default]")]
    pub no_remove_comments: bool,

    #[clap(
        long,
        value_name = "COMMAND",
        env = "PYREFORMAT_FORMATTER",
        default_value = YAPF,
        help = "Formatter command, e.g. 'yapf' or 'python3 -m yapf'"
    )]
    pub formatter: String,

    #[clap( long, value_name = "PATTERN", help = "Glob pattern for files/directories to skip in directory mode [multiple allowed]", action = clap::ArgAction::Append )]
    pub exclude: Vec<String>,
    #[clap(long, help = "Skip the confirmation prompt")]
    pub no_confirm: bool,
    #[clap(long, help = "Check that the formatter is installed")]
    pub check_dependencies: bool,
    #[clap(long, env = "DEBUG", help = "Show debug logging")]
    pub debug: bool,
}

impl PyreformatArgs {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            remove_comments: self.remove_comments && !self.no_remove_comments,
            style_profile: self.style_config.clone(),
            encoding: self.encoding.clone(),
            output_suffix: self.out_file_suffix.clone(),
            ..FormatOptions::default()
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "pyreformat",
    version = "0.1.0",
    about = "Python reformatter with optional comment removal",
    long_about = "Optionally strips comments from Python files, then reformats them with YAPF.\nResults are written next to the inputs or under an output directory.",
    propagate_version = true,
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub main_opts: PyreformatArgs,
}

/// One input file and, when the caller chose it, its output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

/// `dir/name.py` becomes `dir/name<suffix>.py`.
pub fn suffixed_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    name.push(".");
    name.push(SOURCE_EXTENSION);
    input.with_file_name(name)
}

/// Collects `*.py` files below `root`, skipping hidden entries and anything
/// matched by an exclude glob. The result is sorted.
pub fn find_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    let mut w = WalkBuilder::new(root);
    w.standard_filters(false);
    w.hidden(true);
    let mut o = OverrideBuilder::new(root);
    for p in exclude {
        let q = format!("!{}", p);
        o.add(&q).with_context(|| format!("Exclude: {}", p))?;
    }
    let overrides = o.build().context("Overrides")?;
    w.overrides(overrides);

    let mut files = Vec::new();
    for entry in w.build() {
        match entry {
            Ok(e) => {
                let is_source = e.file_type().is_some_and(|ft| ft.is_file())
                    && e.path().extension().is_some_and(|x| x == SOURCE_EXTENSION);
                if is_source {
                    files.push(e.into_path());
                }
            }
            Err(e) => warn!("Skipping unreadable entry: {}", e),
        }
    }
    files.sort();
    debug!("found {} files below {}", files.len(), root.display());
    Ok(files)
}

/// Turns the command line input/output pair into per-file jobs.
///
/// A directory input expands to every source file below it; with an output
/// root each file keeps its path relative to the input directory. Anything
/// else is a single job and is validated when it is processed.
pub fn plan_jobs(in_path: &Path, out_path: Option<&Path>, exclude: &[String]) -> Result<Vec<FileJob>> {
    if !in_path.is_dir() {
        return Ok(vec![FileJob {
            input: in_path.to_path_buf(),
            output: out_path.map(Path::to_path_buf),
        }]);
    }

    let files = find_files(in_path, exclude)?;
    files
        .into_iter()
        .map(|input| {
            let output = match out_path {
                Some(root) => {
                    let relative = input.strip_prefix(in_path).with_context(|| {
                        format!("{} is not below {}", input.display(), in_path.display())
                    })?;
                    Some(root.join(relative))
                }
                None => None,
            };
            Ok(FileJob { input, output })
        })
        .collect()
}
