//! The `remora` block tag
//!
//! Wraps block content in a `<script type='text/x-remora'>` element so that
//! editors don't syntax-highlight client-side template code as HTML:
//!
//! ```text
//! {% remora id='my-template' %}
//!     Hello, ${what}!
//! {% endremora %}
//! ```
//!
//! renders as
//!
//! ```text
//! <script type='text/x-remora' id='my-template'>
//!
//!     Hello, ${what}!
//!
//! </script>
//! ```
//!
//! Everything after the tag name is copied into the opening element as-is.

use crate::error::ParseError;
use crate::parser::ast::{Node, RemoraNode, TagToken};
use crate::parser::TemplateParser;
use crate::renderer::{RenderError, RenderState};
use crate::tags::{TagError, TagRegistry};

/// Name of the opening tag
pub const TAG_NAME: &str = "remora";
/// Name of the closing tag
pub const END_TAG_NAME: &str = "endremora";

const OPEN_PREFIX: &str = "<script type='text/x-remora' ";
const CLOSE: &str = "</script>";

/// Register the tag with `registry`
pub fn register(registry: &mut TagRegistry) -> Result<(), TagError> {
    registry.register(TAG_NAME, parse)
}

/// `{% remora [attributes] %}...{% endremora %}`
pub fn parse<'s, 'r>(
    parser: &mut TemplateParser<'s, 'r>,
    token: &TagToken<'s>,
) -> Result<Node, ParseError> {
    let nodelist = parser.parse_until(&[END_TAG_NAME])?;
    parser.delete_first_token();

    Ok(Node::Remora(RemoraNode {
        attrs: token.rest().to_string(),
        nodelist,
    }))
}

/// Render the marker element around the rendered children
pub fn render(node: &RemoraNode, state: &RenderState<'_>) -> Result<String, RenderError> {
    let inner = node.nodelist.render(state)?;

    let mut out = String::with_capacity(
        OPEN_PREFIX.len() + node.attrs.len() + inner.len() + CLOSE.len() + 3,
    );
    out.push_str(OPEN_PREFIX);
    out.push_str(&node.attrs);
    out.push_str(">\n");
    out.push_str(&inner);
    out.push('\n');
    out.push_str(CLOSE);
    Ok(out)
}
