//! Render context: the key/value environment variables resolve against

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when building a context
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("context must be a table of names to values, found {found}")]
    NotAnObject { found: &'static str },
    #[error("Failed to read context file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse context JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse context TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Variables available to a template render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self, ContextError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ContextError::NotAnObject {
                found: kind_name(&other),
            }),
        }
    }

    /// Parse a JSON object
    pub fn from_json_str(content: &str) -> Result<Self, ContextError> {
        Self::from_value(serde_json::from_str(content)?)
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ContextError> {
        Self::from_value(toml::from_str(content)?)
    }

    /// Load from a file; `.toml` files are read as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self, ContextError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Set a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set a variable, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a top-level variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Resolve a dotted path.
    ///
    /// Each segment after the first is an object key, or an index when the
    /// current value is an array.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.values.get(first.as_ref())?;
        for segment in rest {
            let segment = segment.as_ref();
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Map<String, Value>> for Context {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested() {
        let ctx = Context::from_value(json!({
            "user": { "name": "Ada", "tags": ["a", "b"] }
        }))
        .unwrap();
        assert_eq!(ctx.resolve(&["user", "name"]), Some(&json!("Ada")));
        assert_eq!(ctx.resolve(&["user", "tags", "1"]), Some(&json!("b")));
        assert_eq!(ctx.resolve(&["user", "tags", "9"]), None);
        assert_eq!(ctx.resolve(&["user", "name", "x"]), None);
        assert_eq!(ctx.resolve(&["missing"]), None);
        assert_eq!(ctx.resolve::<&str>(&[]), None);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = Context::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ContextError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn test_from_toml() {
        let ctx = Context::from_toml_str(
            r#"
            name = "World"

            [page]
            title = "Home"
            "#,
        )
        .unwrap();
        assert_eq!(ctx.get("name"), Some(&json!("World")));
        assert_eq!(ctx.resolve(&["page", "title"]), Some(&json!("Home")));
    }

    #[test]
    fn test_from_json() {
        let ctx = Context::from_json_str(r#"{"count": 3}"#).unwrap();
        assert_eq!(ctx.get("count"), Some(&json!(3)));
        assert!(Context::from_json_str("not json").is_err());
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new().with("a", 1).with("b", "two");
        assert_eq!(ctx.get("a"), Some(&json!(1)));
        assert_eq!(ctx.get("b"), Some(&json!("two")));
    }
}
