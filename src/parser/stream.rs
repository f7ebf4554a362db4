//! Token stream and block parser handed to tag handlers

use crate::error::{line_of, ParseError};
use crate::parser::ast::*;
use crate::parser::grammar::parse_expression;
use crate::parser::lexer::{lex, Span, Token};
use crate::tags::TagRegistry;

/// Parse a whole template into its top-level node list
pub fn parse(source: &str, registry: &TagRegistry) -> Result<NodeList, ParseError> {
    let mut parser = TemplateParser::new(source, registry);
    let nodes = parser.parse_until(&[])?;
    tracing::debug!(nodes = nodes.len(), "parsed template");
    Ok(nodes)
}

/// A template's token stream plus the tag registry used to interpret it.
///
/// Tag handlers receive a mutable reference and advance it themselves.
#[derive(Debug)]
pub struct TemplateParser<'s, 'r> {
    source: &'s str,
    tokens: Vec<(Token<'s>, Span)>,
    pos: usize,
    registry: &'r TagRegistry,
    /// Tags whose handlers are currently running, innermost last
    open_tags: Vec<TagToken<'s>>,
}

impl<'s, 'r> TemplateParser<'s, 'r> {
    pub fn new(source: &'s str, registry: &'r TagRegistry) -> Self {
        Self {
            source,
            tokens: lex(source),
            pos: 0,
            registry,
            open_tags: Vec::new(),
        }
    }

    /// The full template source
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Look at the next token without consuming it
    pub fn peek_token(&self) -> Option<&(Token<'s>, Span)> {
        self.tokens.get(self.pos)
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> Option<(Token<'s>, Span)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Discard the next token (usually the terminator `parse_until` stopped at)
    pub fn delete_first_token(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Build nodes until a tag named in `terminators` is reached.
    ///
    /// The terminating tag is left in the stream. Running out of input while
    /// `terminators` is non-empty is an unclosed-block error attributed to
    /// the innermost open tag.
    pub fn parse_until(&mut self, terminators: &[&str]) -> Result<NodeList, ParseError> {
        let mut nodes = NodeList::new();

        while let Some((token, span)) = self.tokens.get(self.pos).cloned() {
            match token {
                Token::Text(text) => {
                    self.pos += 1;
                    nodes.push(Node::Text(text.to_string()));
                }
                Token::Comment => {
                    self.pos += 1;
                }
                Token::Variable {
                    content,
                    content_span,
                } => {
                    self.pos += 1;
                    let variable = self.parse_variable(content, content_span, span)?;
                    nodes.push(Node::Variable(variable));
                }
                Token::Tag(raw) => {
                    let tag = TagToken {
                        contents: raw.trim(),
                        line: line_of(self.source, span.start),
                        span,
                    };
                    let name = tag.name();
                    if name.is_empty() {
                        return Err(ParseError::EmptyTag {
                            span: tag.span,
                            line: tag.line,
                        });
                    }
                    if terminators.contains(&name) {
                        return Ok(nodes);
                    }
                    self.pos += 1;

                    let handler = self.registry.get(name).ok_or_else(|| ParseError::UnknownTag {
                        name: name.to_string(),
                        span: tag.span.clone(),
                        line: tag.line,
                        expected: terminators.iter().map(|t| t.to_string()).collect(),
                    })?;

                    tracing::trace!(tag = name, line = tag.line, "dispatching tag");
                    self.open_tags.push(tag.clone());
                    let node = handler(self, &tag);
                    self.open_tags.pop();
                    nodes.push(node?);
                }
            }
        }

        if terminators.is_empty() {
            return Ok(nodes);
        }

        let expected: Vec<String> = terminators.iter().map(|t| t.to_string()).collect();
        Err(match self.open_tags.last() {
            Some(open) => ParseError::UnclosedTag {
                name: open.name().to_string(),
                span: open.span.clone(),
                line: open.line,
                expected,
            },
            None => {
                let end = self.source.len();
                ParseError::UnclosedTag {
                    name: terminators[0].to_string(),
                    span: end..end,
                    line: line_of(self.source, end),
                    expected,
                }
            }
        })
    }

    fn parse_variable(
        &self,
        content: &'s str,
        content_span: Span,
        span: Span,
    ) -> Result<VariableNode, ParseError> {
        if content.trim().is_empty() {
            return Err(ParseError::EmptyVariable {
                line: line_of(self.source, span.start),
                span,
            });
        }

        let expression = parse_expression(self.source, content, content_span)?;

        let mut filters = Vec::with_capacity(expression.filters.len());
        for call in expression.filters {
            let FilterCall { name, argument } = call.node;
            let line = line_of(self.source, name.span.start);
            let filter = Filter::from_name(name.node.as_str()).ok_or_else(|| {
                ParseError::UnknownFilter {
                    name: name.node.to_string(),
                    span: name.span.clone(),
                    line,
                }
            })?;

            let message = match (filter.takes_argument(), argument.is_some()) {
                (true, false) => Some("requires 1 argument, 0 provided"),
                (false, true) => Some("requires 0 arguments, 1 provided"),
                _ => None,
            };
            if let Some(message) = message {
                return Err(ParseError::FilterArgument {
                    name: name.node.to_string(),
                    span: call.span,
                    line,
                    message: message.to_string(),
                });
            }

            filters.push(AppliedFilter { filter, argument });
        }

        Ok(VariableNode {
            base: expression.base,
            filters,
            span,
        })
    }
}
