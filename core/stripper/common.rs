use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Code,
    LineComment,
    LiteralString,
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Code => write!(f, "code"),
            SpanKind::LineComment => write!(f, "line comment"),
            SpanKind::LiteralString => write!(f, "string literal"),
        }
    }
}

/// Half-open byte range `[start, end)` over the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unterminated {kind} opened by `{delimiter}` at line {line}, column {column} (byte offset {offset})"
)]
pub struct UnterminatedSpanError {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub kind: SpanKind,
    pub delimiter: String,
}

impl UnterminatedSpanError {
    pub(crate) fn new(input: &str, offset: usize, kind: SpanKind, delimiter: &str) -> Self {
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        UnterminatedSpanError {
            offset,
            line,
            column,
            kind,
            delimiter: delimiter.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("literal delimiters must not be empty")]
    EmptyDelimiter,
    #[error("the comment marker must not be empty")]
    EmptyCommentMarker,
}

/// Rebuilds `input` from a span partition produced by `classify`, dropping
/// every `LineComment` span.
pub fn remove_comment_spans(input: &str, spans: &[Span]) -> String {
    let kept: usize = spans
        .iter()
        .filter(|s| s.kind != SpanKind::LineComment)
        .map(Span::len)
        .sum();
    let mut output = String::with_capacity(kept);
    for span in spans {
        if span.kind != SpanKind::LineComment {
            output.push_str(&input[span.range()]);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reports_line_and_column_of_opening_marker() {
        let input = "a = 1\nb = 'xy";
        let err = UnterminatedSpanError::new(input, 10, SpanKind::LiteralString, "'");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
        assert_eq!(
            err.to_string(),
            "unterminated string literal opened by `'` at line 2, column 5 (byte offset 10)"
        );
    }

    #[test]
    fn column_counts_characters_not_bytes() {
        let input = "é = \"x";
        let err = UnterminatedSpanError::new(input, 5, SpanKind::LiteralString, "\"");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn removing_spans_keeps_code_and_literals() {
        let input = "x = '#' # c\ny";
        let spans = [
            Span { start: 0, end: 4, kind: SpanKind::Code },
            Span { start: 4, end: 7, kind: SpanKind::LiteralString },
            Span { start: 7, end: 8, kind: SpanKind::Code },
            Span { start: 8, end: 11, kind: SpanKind::LineComment },
            Span { start: 11, end: 13, kind: SpanKind::Code },
        ];
        assert_eq!(remove_comment_spans(input, &spans), "x = '#' \ny");
    }
}
