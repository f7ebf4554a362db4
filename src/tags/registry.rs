//! Tag registry mapping tag names to their parse functions

use std::collections::HashMap;
use thiserror::Error;

use crate::error::ParseError;
use crate::parser::ast::{Node, TagToken};
use crate::parser::TemplateParser;

/// Compile-time handler for one block tag.
///
/// Called with the parser positioned just after the opening tag; the
/// handler consumes whatever tokens it owns (typically through
/// [`TemplateParser::parse_until`]) and returns the node to insert.
pub type TagParser = for<'s, 'r> fn(&mut TemplateParser<'s, 'r>, &TagToken<'s>) -> Result<Node, ParseError>;

/// Errors that can occur during tag registration
#[derive(Debug, Error, PartialEq)]
pub enum TagError {
    /// Tag name already taken
    #[error("duplicate tag registration: {name}")]
    Duplicate { name: String },

    /// Tag name is not a single word
    #[error("invalid tag name: '{name}'")]
    InvalidName { name: String },
}

/// Registry of block tags available to the template compiler
#[derive(Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, TagParser>,
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("TagRegistry").field("tags", &names).finish()
    }
}

impl TagRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in tag registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .tags
            .insert(super::remora::TAG_NAME.to_string(), super::remora::parse);
        registry
    }

    /// Register a tag parser under `name`
    pub fn register(&mut self, name: &str, parser: TagParser) -> Result<(), TagError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(TagError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.tags.contains_key(name) {
            return Err(TagError::Duplicate {
                name: name.to_string(),
            });
        }

        tracing::debug!(tag = name, "registered template tag");
        self.tags.insert(name.to_string(), parser);
        Ok(())
    }

    /// Get a tag parser by name
    pub fn get(&self, name: &str) -> Option<TagParser> {
        self.tags.get(name).copied()
    }

    /// Check if a tag exists
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Get all tag names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::NodeList;

    fn noop<'s, 'r>(
        _parser: &mut TemplateParser<'s, 'r>,
        _token: &TagToken<'s>,
    ) -> Result<Node, ParseError> {
        Ok(Node::Text(String::new()))
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = TagRegistry::new();
        registry.register("noop", noop).expect("Should register");
        assert!(registry.contains("noop"));
        assert!(registry.get("noop").is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_registry_duplicate_error() {
        let mut registry = TagRegistry::new();
        registry
            .register("noop", noop)
            .expect("First register should succeed");
        let result = registry.register("noop", noop);
        assert_eq!(
            result,
            Err(TagError::Duplicate {
                name: "noop".to_string()
            })
        );
    }

    #[test]
    fn test_registry_rejects_bad_names() {
        let mut registry = TagRegistry::new();
        assert!(matches!(
            registry.register("two words", noop),
            Err(TagError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.register("", noop),
            Err(TagError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_builtins_include_remora() {
        let registry = TagRegistry::with_builtins();
        assert!(registry.contains("remora"));
        assert!(!registry.contains("endremora"));
        assert_eq!(registry.names().count(), 1);
    }

    #[test]
    fn test_registered_parser_is_invoked() {
        let mut registry = TagRegistry::new();
        registry.register("noop", noop).unwrap();
        let nodes = TemplateParser::new("a{% noop %}b", &registry)
            .parse_until(&[])
            .expect("Should parse");
        assert_eq!(
            nodes,
            NodeList(vec![
                Node::Text("a".to_string()),
                Node::Text(String::new()),
                Node::Text("b".to_string()),
            ])
        );
    }
}
