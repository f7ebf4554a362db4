//! Remora Template - a small Django-style template engine with the `remora` tag
//!
//! The `remora` block tag wraps client-side template code in a
//! `<script type='text/x-remora'>` element so editors leave it alone.
//!
//! # Example
//!
//! ```rust
//! use remora_template::{render, Context};
//!
//! let ctx = Context::new().with("name", "World");
//! let out = render("{% remora id='x' %}Hello, {{ name }}!{% endremora %}", &ctx).unwrap();
//! assert_eq!(out, "<script type='text/x-remora' id='x'>\nHello, World!\n</script>");
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod tags;

pub use config::{ConfigError, EngineConfig};
pub use error::ParseError;
pub use parser::{Node, NodeList};
pub use renderer::{Context, ContextError, RenderError};
pub use tags::{TagError, TagParser, TagRegistry};

use thiserror::Error;

/// Errors from compiling and rendering in one step
#[derive(Debug, Error)]
pub enum Error {
    /// The template failed to compile
    #[error("template syntax error: {0}")]
    Parse(#[from] ParseError),

    /// The compiled template failed to render
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Compiles template sources with a fixed tag registry and configuration
#[derive(Debug, Clone)]
pub struct Engine {
    registry: TagRegistry,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with the built-in tags
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: TagRegistry::with_builtins(),
            config,
        }
    }

    /// Replace the tag registry
    pub fn with_registry(mut self, registry: TagRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Mutable access for registering additional tags
    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile a template source
    pub fn compile(&self, source: &str) -> Result<Template, ParseError> {
        let nodes = parser::parse(source, &self.registry)?;
        Ok(Template {
            nodes,
            config: self.config.clone(),
        })
    }

    /// Compile and render in one step
    pub fn render_str(&self, source: &str, context: &Context) -> Result<String, Error> {
        let template = self.compile(source)?;
        Ok(template.render(context)?)
    }
}

/// A compiled template, reusable across renders
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: NodeList,
    config: EngineConfig,
}

impl Template {
    /// The compiled top-level nodes
    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    /// Render against `context`. Compiled templates hold no render state, so
    /// the same template can be rendered any number of times.
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        self.nodes
            .render(&renderer::RenderState::new(context, &self.config))
    }
}

/// Compile with the default engine
pub fn compile(source: &str) -> Result<Template, ParseError> {
    Engine::default().compile(source)
}

/// Compile and render with the default engine
///
/// # Example
///
/// ```rust
/// use remora_template::{render, Context};
///
/// let out = render("{% remora %}${what}{% endremora %}", &Context::new()).unwrap();
/// assert_eq!(out, "<script type='text/x-remora' >\n${what}\n</script>");
/// ```
pub fn render(source: &str, context: &Context) -> Result<String, Error> {
    Engine::default().render_str(source, context)
}
