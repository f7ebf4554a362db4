//! Engine configuration
//!
//! Options can be set in code with the builder methods or loaded from a
//! TOML file:
//!
//! ```toml
//! [engine]
//! autoescape = true
//! strict_variables = false
//! string_if_invalid = ""
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options controlling how compiled templates render
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// HTML-escape variable output unless marked safe
    pub autoescape: bool,
    /// Fail the render when a variable lookup fails
    pub strict_variables: bool,
    /// Emitted in place of a variable that fails to resolve
    pub string_if_invalid: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autoescape: true,
            strict_variables: false,
            string_if_invalid: String::new(),
        }
    }
}

/// TOML structure for deserializing config files
#[derive(Deserialize)]
struct TomlConfig {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        Ok(parsed.engine)
    }

    /// Set whether variable output is HTML-escaped
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }

    /// Set whether failed lookups are render errors
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Set the placeholder for failed lookups
    pub fn with_string_if_invalid(mut self, placeholder: impl Into<String>) -> Self {
        self.string_if_invalid = placeholder.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.autoescape);
        assert!(!config.strict_variables);
        assert_eq!(config.string_if_invalid, "");
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::new()
            .with_autoescape(false)
            .with_strict_variables(true)
            .with_string_if_invalid("??");

        assert!(!config.autoescape);
        assert!(config.strict_variables);
        assert_eq!(config.string_if_invalid, "??");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EngineConfig::from_toml_str(
            r#"
            [engine]
            strict_variables = true
            "#,
        )
        .unwrap();
        assert!(config.autoescape);
        assert!(config.strict_variables);
    }

    #[test]
    fn test_from_toml_empty() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = EngineConfig::from_toml_str("[engine]\nautoescape = \"yes\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
