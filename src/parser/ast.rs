//! Node tree types for compiled templates

pub use crate::renderer::filters::Filter;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of nodes, as produced by one `parse_until` call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeList(pub Vec<Node>);

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.0.push(node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }
}

/// A compiled, renderable template construct
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal template text, emitted unchanged
    Text(String),
    /// `{{ expression }}`
    Variable(VariableNode),
    /// `{% remora ... %}...{% endremora %}`
    Remora(RemoraNode),
}

/// A variable expression output, with its filters resolved
#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    pub base: Spanned<Operand>,
    pub filters: Vec<AppliedFilter>,
    pub span: Span,
}

/// A filter known to exist, with its checked argument
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFilter {
    pub filter: Filter,
    pub argument: Option<Spanned<Operand>>,
}

/// One `remora` block.
///
/// `attrs` is copied from the opening tag without validation and is emitted
/// without escaping. Templates from untrusted authors can inject arbitrary
/// markup through it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoraNode {
    pub attrs: String,
    pub nodelist: NodeList,
}

/// Parsed variable expression: `base|filter:arg|filter`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub base: Spanned<Operand>,
    pub filters: Vec<Spanned<FilterCall>>,
}

/// A value source in an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Dotted context lookup, e.g. `user.name` or `items.0`
    Lookup(Vec<String>),
    /// Quoted string literal
    String(String),
    /// Numeric literal
    Number(f64),
}

/// A filter application in an expression
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: Spanned<Identifier>,
    pub argument: Option<Spanned<Operand>>,
}

/// The contents of one `{% ... %}` tag, handed to tag parsers
#[derive(Debug, Clone, PartialEq)]
pub struct TagToken<'s> {
    /// Contents between the delimiters, trimmed
    pub contents: &'s str,
    /// Span of the whole tag including delimiters
    pub span: Span,
    /// 1-based line of the opening delimiter
    pub line: usize,
}

impl<'s> TagToken<'s> {
    /// The tag name (first whitespace-separated word)
    pub fn name(&self) -> &'s str {
        self.contents.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the tag name, with the separating whitespace removed
    pub fn rest(&self) -> &'s str {
        match self.contents.find(char::is_whitespace) {
            Some(idx) => self.contents[idx..].trim_start(),
            None => "",
        }
    }

    /// All whitespace-separated words, the name included
    pub fn bits(&self) -> Vec<&'s str> {
        self.contents.split_whitespace().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(contents: &str) -> TagToken<'_> {
        TagToken {
            contents,
            span: 0..contents.len(),
            line: 1,
        }
    }

    #[test]
    fn test_tag_name_and_rest() {
        let t = tag("remora   id='x' class=\"a b\"");
        assert_eq!(t.name(), "remora");
        assert_eq!(t.rest(), "id='x' class=\"a b\"");
    }

    #[test]
    fn test_tag_without_arguments() {
        let t = tag("endremora");
        assert_eq!(t.name(), "endremora");
        assert_eq!(t.rest(), "");
    }

    #[test]
    fn test_tag_rest_keeps_inner_whitespace() {
        let t = tag("remora\tdata-x='1'   data-y='2'");
        assert_eq!(t.rest(), "data-x='1'   data-y='2'");
        assert_eq!(t.bits(), vec!["remora", "data-x='1'", "data-y='2'"]);
    }

    #[test]
    fn test_nodelist_push() {
        let mut list = NodeList::new();
        assert!(list.is_empty());
        list.push(Node::Text("a".to_string()));
        assert_eq!(list.len(), 1);
    }
}
