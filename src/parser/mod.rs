//! Template parser: markup lexer, expression grammar and block parser

pub mod ast;
mod grammar;
pub mod lexer;
mod stream;

pub use ast::*;
pub use grammar::parse_expression;
pub use stream::{parse, TemplateParser};
