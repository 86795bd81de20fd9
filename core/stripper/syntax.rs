use super::common::SyntaxError;

/// A quoting marker that opens and closes a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralDelimiter {
    marker: String,
    multiline: bool,
    escape: Option<char>,
}

impl LiteralDelimiter {
    /// A literal that must close on the line it opened on. `escape` suppresses
    /// the closing meaning of the character after it.
    pub fn single_line(marker: impl Into<String>, escape: char) -> Self {
        LiteralDelimiter {
            marker: marker.into(),
            multiline: false,
            escape: Some(escape),
        }
    }

    /// A literal that may span lines and has no escape convention.
    pub fn multiline(marker: impl Into<String>) -> Self {
        LiteralDelimiter {
            marker: marker.into(),
            multiline: true,
            escape: None,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn escape(&self) -> Option<char> {
        self.escape
    }
}

/// Literal delimiters and the line comment marker of a source language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalSyntax {
    delimiters: Vec<LiteralDelimiter>,
    comment_marker: String,
}

impl LexicalSyntax {
    pub fn new(
        mut delimiters: Vec<LiteralDelimiter>,
        comment_marker: impl Into<String>,
    ) -> Result<Self, SyntaxError> {
        let comment_marker = comment_marker.into();
        if comment_marker.is_empty() {
            return Err(SyntaxError::EmptyCommentMarker);
        }
        if delimiters.iter().any(|d| d.marker.is_empty()) {
            return Err(SyntaxError::EmptyDelimiter);
        }
        // Longest match first: `"""` must win over `"`.
        delimiters.sort_by(|a, b| b.marker.len().cmp(&a.marker.len()));
        Ok(LexicalSyntax {
            delimiters,
            comment_marker,
        })
    }

    pub fn python() -> Self {
        LexicalSyntax {
            delimiters: vec![
                LiteralDelimiter::multiline("\"\"\""),
                LiteralDelimiter::multiline("'''"),
                LiteralDelimiter::single_line("\"", '\\'),
                LiteralDelimiter::single_line("'", '\\'),
            ],
            comment_marker: "#".to_string(),
        }
    }

    pub fn delimiters(&self) -> &[LiteralDelimiter] {
        &self.delimiters
    }

    pub fn comment_marker(&self) -> &str {
        &self.comment_marker
    }

    pub(crate) fn delimiter_at(&self, rest: &str) -> Option<&LiteralDelimiter> {
        self.delimiters
            .iter()
            .find(|d| rest.starts_with(d.marker.as_str()))
    }
}

impl Default for LexicalSyntax {
    fn default() -> Self {
        LexicalSyntax::python()
    }
}
