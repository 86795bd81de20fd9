pub mod common;
pub mod scanner;
pub mod syntax;

pub use common::{Span, SpanKind, SyntaxError, UnterminatedSpanError, remove_comment_spans};
pub use scanner::classify;
pub use syntax::{LexicalSyntax, LiteralDelimiter};

/// Returns `input` with every line comment removed. Literal contents and all
/// line terminators are kept verbatim.
pub fn strip_comments(input: &str, syntax: &LexicalSyntax) -> Result<String, UnterminatedSpanError> {
    let spans = classify(input, syntax)?;
    if spans.iter().all(|s| s.kind != SpanKind::LineComment) {
        return Ok(input.to_string());
    }
    Ok(remove_comment_spans(input, &spans))
}
