use crate::command_runner::{YAPF, run_filter};
use std::io;

pub const DEFAULT_STYLE_PROFILE: &str = "facebook";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub changed: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("formatter '{tool}' rejected the input: {stderr}")]
    Rejected { tool: String, stderr: String },

    #[error("failed to run formatter '{tool}': {source}")]
    Unavailable {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("formatter '{tool}' produced output that is not valid UTF-8")]
    InvalidOutput { tool: String },
}

/// Rewrites source text according to a named style profile.
pub trait StyleFormatter: Sync {
    fn format(&self, source: &str, style_profile: &str) -> Result<Formatted, FormatError>;
}

impl<F> StyleFormatter for F
where
    F: Fn(&str, &str) -> Result<Formatted, FormatError> + Sync,
{
    fn format(&self, source: &str, style_profile: &str) -> Result<Formatted, FormatError> {
        self(source, style_profile)
    }
}

/// Formats through the `yapf` executable (or a compatible program).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YapfFormatter {
    program: String,
    leading_args: Vec<String>,
}

impl YapfFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        YapfFormatter {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Parses a command line such as `python3 -m yapf`.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(YapfFormatter {
            program,
            leading_args: words.collect(),
        })
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.leading_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for YapfFormatter {
    fn default() -> Self {
        YapfFormatter::new(YAPF)
    }
}

impl StyleFormatter for YapfFormatter {
    fn format(&self, source: &str, style_profile: &str) -> Result<Formatted, FormatError> {
        let mut args: Vec<&str> = self.leading_args.iter().map(String::as_str).collect();
        args.extend(["--style", style_profile]);
        let output = run_filter(&self.program, &args, source.as_bytes()).map_err(|source| {
            FormatError::Unavailable {
                tool: self.program.clone(),
                source,
            }
        })?;

        if !output.status.success() {
            return Err(FormatError::Rejected {
                tool: self.program.clone(),
                stderr: output.stderr_lossy(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidOutput {
            tool: self.program.clone(),
        })?;
        let changed = text != source;
        Ok(Formatted { text, changed })
    }
}
