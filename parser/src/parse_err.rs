use lexer::SpannedToken;
use shared_context::source_map::SourceMap;
use shared_context::Span;
use std::fmt;

/// A `SyntaxError` (spec §7): the lexer or parser couldn't make sense of
/// the token stream. Abort parsing of that file (§7 propagation policy).
#[derive(Debug)]
pub struct ParseErr {
    formatted: String,
}

impl ParseErr {
    pub fn new(message: String, token: &SpannedToken, source_map: &SourceMap) -> Self {
        let span = span_of(token);
        Self {
            formatted: source_map.format_message(message, span),
        }
    }

    pub fn expected(expected: &str, found: &SpannedToken, source_map: &SourceMap) -> Self {
        Self::new(
            format!("expected {expected}, found '{}'", found.get_lexeme()),
            found,
            source_map,
        )
    }

    pub fn at_eof(message: impl Into<String>) -> Self {
        Self { formatted: message.into() }
    }
}

fn span_of(token: &SpannedToken) -> Span {
    let span = token.get_span();
    Span::new(span.col_start, span.col_end, span.line_num)
}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}

impl std::error::Error for ParseErr {}
