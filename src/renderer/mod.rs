//! Renders compiled node trees against a context
//!
//! Every node kind renders through the same `render(state)` entry point, so
//! a block tag's children resolve variables exactly like top-level nodes do.

pub mod context;
pub mod filters;

pub use context::{Context, ContextError};
pub use filters::escape_html;

use serde_json::Value;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::parser::ast::{Node, NodeList, Operand, Span, VariableNode};
use crate::tags::remora;
use filters::{display, Output};

/// Errors that can occur while rendering
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// Lookup failed with `strict_variables` enabled
    #[error("undefined variable '{name}' at {span:?}")]
    UndefinedVariable { name: String, span: Span },
}

/// Everything a node needs to render
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub context: &'a Context,
    pub config: &'a EngineConfig,
}

impl<'a> RenderState<'a> {
    pub fn new(context: &'a Context, config: &'a EngineConfig) -> Self {
        Self { context, config }
    }

    fn operand(&self, operand: &Operand, span: &Span) -> Result<Option<Value>, RenderError> {
        match operand {
            Operand::String(s) => Ok(Some(Value::String(s.clone()))),
            Operand::Number(n) => Ok(Some(number_value(*n))),
            Operand::Lookup(path) => match self.context.resolve(path.as_slice()) {
                Some(value) => Ok(Some(value.clone())),
                None if self.config.strict_variables => Err(RenderError::UndefinedVariable {
                    name: path.join("."),
                    span: span.clone(),
                }),
                None => {
                    tracing::debug!(variable = %path.join("."), "variable did not resolve");
                    Ok(None)
                }
            },
        }
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

impl NodeList {
    /// Render every node in order and concatenate the results
    pub fn render(&self, state: &RenderState<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        for node in self.iter() {
            out.push_str(&node.render(state)?);
        }
        Ok(out)
    }
}

impl Node {
    pub fn render(&self, state: &RenderState<'_>) -> Result<String, RenderError> {
        match self {
            Node::Text(text) => Ok(text.clone()),
            Node::Variable(variable) => render_variable(variable, state),
            Node::Remora(block) => remora::render(block, state),
        }
    }
}

fn render_variable(node: &VariableNode, state: &RenderState<'_>) -> Result<String, RenderError> {
    let config = state.config;

    let mut output = match state.operand(&node.base.node, &node.base.span)? {
        Some(value) => Output { value, safe: false },
        // A non-empty placeholder is emitted as-is, skipping filters
        None if !config.string_if_invalid.is_empty() => {
            return Ok(config.string_if_invalid.clone());
        }
        None => Output {
            value: Value::String(String::new()),
            safe: false,
        },
    };

    for applied in &node.filters {
        let argument = match &applied.argument {
            Some(arg) => state.operand(&arg.node, &arg.span)?,
            None => None,
        };
        output = applied.filter.apply(output, argument);
    }

    let text = display(&output.value);
    if config.autoescape && !output.safe {
        Ok(escape_html(&text))
    } else {
        Ok(text)
    }
}
