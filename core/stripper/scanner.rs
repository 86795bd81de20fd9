use super::common::{Span, SpanKind, UnterminatedSpanError};
use super::syntax::{LexicalSyntax, LiteralDelimiter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'s> {
    Code,
    InLiteral {
        delimiter: &'s LiteralDelimiter,
        start: usize,
    },
    InComment {
        start: usize,
    },
}

fn is_line_terminator(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn push_span(spans: &mut Vec<Span>, kind: SpanKind, start: usize, end: usize) {
    if start < end {
        spans.push(Span { start, end, kind });
    }
}

/// Splits `input` into code, comment and literal spans in one pass.
///
/// The returned spans partition the input. A comment span stops before the
/// line terminator that ends it; an unterminated comment at end of text is
/// valid. A literal still open at end of text, or a single-line literal that
/// reaches a line terminator, is an error naming the opening marker.
pub fn classify(input: &str, syntax: &LexicalSyntax) -> Result<Vec<Span>, UnterminatedSpanError> {
    let mut spans = Vec::new();
    let mut state = ScanState::Code;
    let mut code_start = 0;
    let mut pos = 0;

    while let Some(c) = input[pos..].chars().next() {
        let rest = &input[pos..];
        state = match state {
            ScanState::Code => {
                if let Some(delimiter) = syntax.delimiter_at(rest) {
                    push_span(&mut spans, SpanKind::Code, code_start, pos);
                    let start = pos;
                    pos += delimiter.marker().len();
                    ScanState::InLiteral { delimiter, start }
                } else if rest.starts_with(syntax.comment_marker()) {
                    push_span(&mut spans, SpanKind::Code, code_start, pos);
                    let start = pos;
                    pos += syntax.comment_marker().len();
                    ScanState::InComment { start }
                } else {
                    pos += c.len_utf8();
                    ScanState::Code
                }
            }
            ScanState::InLiteral { delimiter, start } => {
                if !delimiter.is_multiline() && delimiter.escape() == Some(c) {
                    pos += c.len_utf8();
                    let mut escaped = input[pos..].chars();
                    match (escaped.next(), escaped.next()) {
                        (Some('\r'), Some('\n')) => pos += 2,
                        (Some(next), _) => pos += next.len_utf8(),
                        (None, _) => {}
                    }
                    state
                } else if rest.starts_with(delimiter.marker()) {
                    pos += delimiter.marker().len();
                    push_span(&mut spans, SpanKind::LiteralString, start, pos);
                    code_start = pos;
                    ScanState::Code
                } else if !delimiter.is_multiline() && is_line_terminator(c) {
                    return Err(UnterminatedSpanError::new(
                        input,
                        start,
                        SpanKind::LiteralString,
                        delimiter.marker(),
                    ));
                } else {
                    pos += c.len_utf8();
                    state
                }
            }
            ScanState::InComment { start } => {
                if is_line_terminator(c) {
                    // The terminator belongs to the following code span.
                    push_span(&mut spans, SpanKind::LineComment, start, pos);
                    code_start = pos;
                    ScanState::Code
                } else {
                    pos += c.len_utf8();
                    state
                }
            }
        };
    }

    match state {
        ScanState::Code => push_span(&mut spans, SpanKind::Code, code_start, input.len()),
        ScanState::InComment { start } => {
            push_span(&mut spans, SpanKind::LineComment, start, input.len())
        }
        ScanState::InLiteral { delimiter, start } => {
            return Err(UnterminatedSpanError::new(
                input,
                start,
                SpanKind::LiteralString,
                delimiter.marker(),
            ));
        }
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripper::strip_comments;
    use rstest::rstest;

    fn python(input: &str) -> Result<String, UnterminatedSpanError> {
        strip_comments(input, &LexicalSyntax::python())
    }

    fn kinds(input: &str) -> Vec<(SpanKind, &str)> {
        classify(input, &LexicalSyntax::python())
            .unwrap()
            .into_iter()
            .map(|s| (s.kind, &input[s.range()]))
            .collect()
    }

    #[rstest]
    #[case::no_comments("x = 1\ny = 2\n", "x = 1\ny = 2\n")]
    #[case::trailing_comment("code1  # a comment\ncode2", "code1  \ncode2")]
    #[case::comment_only_line("# header\nx = 1\n", "\nx = 1\n")]
    #[case::unterminated_trailing_comment("x = 1  # note", "x = 1  ")]
    #[case::hash_in_double_quotes("s = \"a # b\"  # c\n", "s = \"a # b\"  \n")]
    #[case::hash_in_single_quotes("s = '#'\n", "s = '#'\n")]
    #[case::escaped_quote("\"a\\\"b\" # c", "\"a\\\"b\" ")]
    #[case::escaped_backslash("'\\\\' # c\n", "'\\\\' \n")]
    #[case::escaped_line_break("s = 'a\\\nb'  # c\n", "s = 'a\\\nb'  \n")]
    #[case::escaped_crlf("s = 'a\\\r\nb'\r\n", "s = 'a\\\r\nb'\r\n")]
    #[case::triple_quoted_multiline("\"\"\"doc\n# not a comment\n\"\"\"\n", "\"\"\"doc\n# not a comment\n\"\"\"\n")]
    #[case::triple_single_quoted("x = '''it's # here'''  # gone\n", "x = '''it's # here'''  \n")]
    #[case::mixed_quotes("s = 'say \"hi\" # no'\n", "s = 'say \"hi\" # no'\n")]
    #[case::empty_string_literal("s = \"\"  # c\n", "s = \"\"  \n")]
    #[case::crlf_line_endings("a  # c\r\nb\r\n", "a  \r\nb\r\n")]
    #[case::consecutive_comments("#a\n#b\n", "\n\n")]
    #[case::empty_input("", "")]
    #[case::non_ascii("名前 = 'ü#'  # コメント\n", "名前 = 'ü#'  \n")]
    fn strips_python_comments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(python(input).unwrap(), expected);
    }

    #[test]
    fn escaped_quote_keeps_whole_token_as_one_literal() {
        assert_eq!(
            kinds("\"a\\\"b\""),
            vec![(SpanKind::LiteralString, "\"a\\\"b\"")]
        );
    }

    #[test]
    fn triple_quote_is_not_two_single_quotes() {
        assert_eq!(
            kinds("\"\"\"a\"b\"\"\" x"),
            vec![
                (SpanKind::LiteralString, "\"\"\"a\"b\"\"\""),
                (SpanKind::Code, " x"),
            ]
        );
    }

    #[test]
    fn triple_quoted_literal_has_no_escape() {
        assert_eq!(
            kinds("'''a\\''' #c"),
            vec![
                (SpanKind::LiteralString, "'''a\\'''"),
                (SpanKind::Code, " "),
                (SpanKind::LineComment, "#c"),
            ]
        );
    }

    #[test]
    fn comment_span_excludes_line_terminator() {
        assert_eq!(
            kinds("a # b\nc"),
            vec![
                (SpanKind::Code, "a "),
                (SpanKind::LineComment, "# b"),
                (SpanKind::Code, "\nc"),
            ]
        );
    }

    #[test]
    fn unterminated_literal_at_end_of_text() {
        let err = python("x = \"abc").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.kind, SpanKind::LiteralString);
        assert_eq!(err.delimiter, "\"");
    }

    #[test]
    fn unterminated_triple_quoted_literal() {
        let err = python("a = 1\nb = '''doc\nmore\n").unwrap_err();
        assert_eq!(err.offset, 10);
        assert_eq!(err.line, 2);
        assert_eq!(err.delimiter, "'''");
    }

    #[test]
    fn single_line_literal_cannot_cross_a_line_break() {
        let err = python("s = 'abc\n# c\n").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn dangling_escape_at_end_of_text_is_unterminated() {
        let err = python("s = 'abc\\").unwrap_err();
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn custom_syntax_with_multi_char_comment_marker() {
        let syntax = LexicalSyntax::new(vec![LiteralDelimiter::single_line("\"", '\\')], "//")
            .unwrap();
        assert_eq!(
            strip_comments("a = \"//\"; // c\nb / 2 // d", &syntax).unwrap(),
            "a = \"//\"; \nb / 2 "
        );
    }
}
