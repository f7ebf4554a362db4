//! Lexers for template markup and variable expressions using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Raw markup tokens as produced by logos
#[derive(Logos, Debug, Clone, PartialEq)]
enum Markup<'s> {
    #[token("{%", |lex| close(lex, "%}"))]
    Tag(&'s str),
    #[token("{{", |lex| close(lex, "}}"))]
    Variable(&'s str),
    #[token("{#", |lex| close(lex, "#}").is_some())]
    Comment,

    #[regex(r"[^{]+")]
    Text,
    #[token("{")]
    Brace,
}

/// Consume up to and including `end`, yielding the text in between.
///
/// Markup never spans lines; an opener with no closer on the same line is
/// not markup and the lexer reports it as an error, which `lex` turns back
/// into text.
fn close<'s>(lex: &mut logos::Lexer<'s, Markup<'s>>, end: &str) -> Option<&'s str> {
    let rest = lex.remainder();
    let idx = rest.find(end)?;
    let inner = &rest[..idx];
    if inner.contains('\n') {
        return None;
    }
    lex.bump(idx + end.len());
    Some(inner)
}

/// A template-level token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'s> {
    /// Literal text
    Text(&'s str),
    /// `{{ ... }}`: raw inner text and the span of that inner text
    Variable { content: &'s str, content_span: Span },
    /// `{% ... %}`: raw inner text
    Tag(&'s str),
    /// `{# ... #}`
    Comment,
}

/// Split template source into spanned markup tokens.
///
/// Adjacent text fragments (including stray `{` and unterminated openers)
/// are merged into a single `Text` token.
pub fn lex<'s>(source: &'s str) -> Vec<(Token<'s>, Span)> {
    let mut tokens: Vec<(Token<'s>, Span)> = Vec::new();
    let mut text_start: Option<usize> = None;

    let flush = |tokens: &mut Vec<(Token<'s>, Span)>, start: Option<usize>, end: usize| {
        if let Some(start) = start {
            tokens.push((Token::Text(&source[start..end]), start..end));
        }
    };

    for (result, span) in Markup::lexer(source).spanned() {
        let token = match result {
            Ok(Markup::Tag(inner)) => Token::Tag(inner),
            Ok(Markup::Variable(inner)) => Token::Variable {
                content: inner,
                content_span: span.start + 2..span.end - 2,
            },
            Ok(Markup::Comment) => Token::Comment,
            Ok(Markup::Text) | Ok(Markup::Brace) | Err(()) => {
                text_start.get_or_insert(span.start);
                continue;
            }
        };
        flush(&mut tokens, text_start.take(), span.start);
        tokens.push((token, span));
    }
    flush(&mut tokens, text_start, source.len());

    tokens
}

/// Tokens inside a `{{ ... }}` expression
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum ExprToken {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Digits(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unquote(lex.slice()))]
    String(String),

    #[token(".")]
    Dot,
    #[token("|")]
    Pipe,
    #[token(":")]
    Colon,
    #[token("-")]
    Minus,
}

/// Strip the surrounding quotes and resolve backslash escapes
fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Lex an expression. Spans are shifted by `offset` so they index the
/// template source. On an unrecognised character, returns its span.
pub fn lex_expression(input: &str, offset: usize) -> Result<Vec<(ExprToken, Span)>, Span> {
    ExprToken::lexer(input)
        .spanned()
        .map(|(tok, span)| {
            let span = span.start + offset..span.end + offset;
            match tok {
                Ok(t) => Ok((t, span)),
                Err(()) => Err(span),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        lex(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello world"), vec![Token::Text("hello world")]);
    }

    #[test]
    fn test_tag_variable_comment() {
        let tokens = kinds("a{% remora id='x' %}b{{ name }}{# note #}c");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a"),
                Token::Tag(" remora id='x' "),
                Token::Text("b"),
                Token::Variable {
                    content: " name ",
                    content_span: 23..29,
                },
                Token::Comment,
                Token::Text("c"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = lex("ab{% x %}");
        assert_eq!(tokens[0].1, 0..2);
        assert_eq!(tokens[1].1, 2..9);
    }

    #[test]
    fn test_stray_braces_are_text() {
        assert_eq!(
            kinds("function() { return ${what}; }"),
            vec![Token::Text("function() { return ${what}; }")]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        assert_eq!(kinds("a {% remora b"), vec![Token::Text("a {% remora b")]);
    }

    #[test]
    fn test_tag_does_not_span_lines() {
        assert_eq!(
            kinds("{% remora\n%}x"),
            vec![Token::Text("{% remora\n%}x")]
        );
    }

    #[test]
    fn test_expression_tokens() {
        let tokens: Vec<_> = lex_expression(r#" user.name|default:"a \"b\"" "#, 0)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                ExprToken::Ident("user".to_string()),
                ExprToken::Dot,
                ExprToken::Ident("name".to_string()),
                ExprToken::Pipe,
                ExprToken::Ident("default".to_string()),
                ExprToken::Colon,
                ExprToken::String("a \"b\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_expression_single_quotes_and_numbers() {
        let tokens: Vec<_> = lex_expression("'x' -1.5 items.0", 0)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                ExprToken::String("x".to_string()),
                ExprToken::Minus,
                ExprToken::Digits("1".to_string()),
                ExprToken::Dot,
                ExprToken::Digits("5".to_string()),
                ExprToken::Ident("items".to_string()),
                ExprToken::Dot,
                ExprToken::Digits("0".to_string()),
            ]
        );
    }

    #[test]
    fn test_expression_offset_and_error_span() {
        let tokens = lex_expression(" a", 10).unwrap();
        assert_eq!(tokens[0].1, 11..12);

        let err = lex_expression("a @ b", 5).unwrap_err();
        assert_eq!(err, 7..8);
    }
}
