pub mod command_runner;
pub mod dependency_checker;
pub mod encoding;
pub mod file_finder;
pub mod formatter;
pub mod processor;
pub mod stripper;

pub use dependency_checker::check_dependencies;
pub use encoding::{EncodingError, TextEncoding};
pub use file_finder::{
    CliArgs, Command, CompletionArgs, FileJob, PyreformatArgs, find_files, plan_jobs,
    suffixed_output_path,
};
pub use formatter::{FormatError, Formatted, StyleFormatter, YapfFormatter};
pub use processor::{
    BatchReport, FormatOptions, ProcessedFileResult, format_file, format_source, process_files,
};
pub use stripper::{LexicalSyntax, Span, SpanKind, UnterminatedSpanError, classify, strip_comments};

/// Why a single file could not be processed.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    UnterminatedSpan(#[from] UnterminatedSpanError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}
