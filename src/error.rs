//! Error types for template compilation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::ExprToken;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A template that failed to compile
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty block tag on line {line}")]
    EmptyTag { span: Span, line: usize },

    #[error("Empty variable tag on line {line}")]
    EmptyVariable { span: Span, line: usize },

    #[error(
        "Invalid block tag on line {line}: '{name}'{}. Did you forget to register or load this tag?",
        format_expected_tag(.expected)
    )]
    UnknownTag {
        name: String,
        span: Span,
        line: usize,
        expected: Vec<String>,
    },

    #[error(
        "Unclosed tag on line {line}: '{name}'. Looking for one of: {}.",
        .expected.join(", ")
    )]
    UnclosedTag {
        name: String,
        span: Span,
        line: usize,
        expected: Vec<String>,
    },

    #[error("Invalid filter on line {line}: '{name}'")]
    UnknownFilter { name: String, span: Span, line: usize },

    #[error("Invalid arguments for filter '{name}' on line {line}: {message}")]
    FilterArgument {
        name: String,
        span: Span,
        line: usize,
        message: String,
    },

    #[error("Could not parse variable on line {line}: {message}")]
    Expression {
        span: Span,
        line: usize,
        message: String,
        expected: Vec<String>,
    },
}

fn format_expected_tag(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        let quoted: Vec<String> = expected.iter().map(|e| format!("'{}'", e)).collect();
        format!(", expected {}", quoted.join(" or "))
    }
}

/// 1-based line number of a byte offset
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

impl ParseError {
    /// Source range the error points at
    pub fn span(&self) -> &Span {
        match self {
            ParseError::EmptyTag { span, .. }
            | ParseError::EmptyVariable { span, .. }
            | ParseError::UnknownTag { span, .. }
            | ParseError::UnclosedTag { span, .. }
            | ParseError::UnknownFilter { span, .. }
            | ParseError::FilterArgument { span, .. }
            | ParseError::Expression { span, .. } => span,
        }
    }

    /// 1-based line the error is reported on
    pub fn line(&self) -> usize {
        match self {
            ParseError::EmptyTag { line, .. }
            | ParseError::EmptyVariable { line, .. }
            | ParseError::UnknownTag { line, .. }
            | ParseError::UnclosedTag { line, .. }
            | ParseError::UnknownFilter { line, .. }
            | ParseError::FilterArgument { line, .. }
            | ParseError::Expression { line, .. } => *line,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let label = match self {
            ParseError::Expression { expected, .. } if !expected.is_empty() => {
                format!("expected {}", expected.join(", "))
            }
            ParseError::UnclosedTag { expected, .. } => {
                format!("this block is never closed with {}", expected.join(" or "))
            }
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    pub(crate) fn from_rich(err: chumsky::error::Rich<'_, ExprToken>, source: &str) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of expression".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of expression".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        let span = err.span().into_range();
        ParseError::Expression {
            line: line_of(source, span.start),
            span,
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &ExprToken) -> String {
    match tok {
        ExprToken::Ident(s) => format!("identifier '{}'", s),
        ExprToken::Digits(d) => format!("number {}", d),
        ExprToken::String(s) => format!("string \"{}\"", s),
        ExprToken::Dot => "'.'".to_string(),
        ExprToken::Pipe => "'|'".to_string(),
        ExprToken::Colon => "':'".to_string(),
        ExprToken::Minus => "'-'".to_string(),
    }
}
