//! Variable expression parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::{line_of, ParseError};
use crate::parser::ast::*;
use crate::parser::lexer::{lex_expression, ExprToken};

/// Parse the inside of a `{{ ... }}` tag.
///
/// `content_span` locates `content` within `source`, so every span in the
/// returned expression (and in any error) indexes the whole template.
pub fn parse_expression(
    source: &str,
    content: &str,
    content_span: std::ops::Range<usize>,
) -> Result<Expression, ParseError> {
    let offset = content_span.start;
    let end = content_span.end;

    let tokens = lex_expression(content, offset).map_err(|span| ParseError::Expression {
        line: line_of(source, span.start),
        message: format!(
            "Unexpected character '{}'",
            source.get(span.clone()).unwrap_or("?")
        ),
        span,
        expected: Vec::new(),
    })?;

    let token_stream = Stream::from_iter(
        tokens
            .into_iter()
            .map(|(tok, span)| (tok, SimpleSpan::from(span))),
    )
    .map((end..end).into(), |(t, s): (_, _)| (t, s));

    expression_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => ParseError::from_rich(err, source),
            None => ParseError::Expression {
                span: content_span.clone(),
                line: line_of(source, offset),
                message: "invalid expression".to_string(),
                expected: Vec::new(),
            },
        })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn expression_parser<'a, I>() -> impl Parser<'a, I, Expression, extra::Err<Rich<'a, ExprToken>>> + Clone
where
    I: ValueInput<'a, Token = ExprToken, Span = SimpleSpan>,
{
    let identifier = select! {
        ExprToken::Ident(s) => s,
    };

    let digits = select! {
        ExprToken::Digits(d) => d,
    };

    let string_literal = select! {
        ExprToken::String(s) => Operand::String(s),
    };

    // -?digits(.digits)?
    let number_literal = just(ExprToken::Minus)
        .or_not()
        .then(digits.clone())
        .then(just(ExprToken::Dot).ignore_then(digits.clone()).or_not())
        .try_map(|((neg, whole), frac), span| {
            let text = match frac {
                Some(frac) => format!("{}.{}", whole, frac),
                None => whole,
            };
            let value: f64 = text
                .parse()
                .map_err(|_| Rich::custom(span, format!("invalid number '{}'", text)))?;
            Ok(Operand::Number(if neg.is_some() { -value } else { value }))
        });

    // name(.segment)* where a segment is an attribute name or list index
    let lookup = identifier
        .clone()
        .then(
            just(ExprToken::Dot)
                .ignore_then(choice((identifier.clone(), digits.clone())))
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(first, rest)| {
            let mut path = vec![first];
            path.extend(rest);
            Operand::Lookup(path)
        });

    let operand = choice((string_literal, number_literal, lookup))
        .map_with(|op, e| Spanned::new(op, span_range(&e.span())));

    let filter = just(ExprToken::Pipe)
        .ignore_then(
            identifier
                .clone()
                .map_with(|name, e| Spanned::new(Identifier::new(name), span_range(&e.span()))),
        )
        .then(just(ExprToken::Colon).ignore_then(operand.clone()).or_not())
        .map_with(|(name, argument), e| {
            Spanned::new(FilterCall { name, argument }, span_range(&e.span()))
        });

    operand
        .then(filter.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(base, filters)| Expression { base, filters })
}
