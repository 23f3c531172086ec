//! Code generation configuration (quire.toml `[codegen]` sections)
//!
//! Controls where generated text finds its runtime helpers and how it is
//! indented. Every field has a default, so an empty document is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Top-level code generation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CodegenConfig {
    /// JavaScript backend settings
    #[serde(default)]
    pub javascript: JavaScriptConfig,

    /// Python backend settings
    #[serde(default)]
    pub python: PythonConfig,
}

/// JavaScript backend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JavaScriptConfig {
    /// Dotted namespace holding the runtime helpers (default: "quire.rt")
    #[serde(default = "default_js_namespace")]
    pub runtime_namespace: String,

    /// One level of indentation (default: two spaces)
    #[serde(default = "default_js_indent")]
    pub indent: String,
}

/// Python backend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PythonConfig {
    /// Module holding the runtime helpers (default: "quire_rt")
    #[serde(default = "default_py_module")]
    pub runtime_module: String,

    /// One level of indentation (default: four spaces)
    #[serde(default = "default_py_indent")]
    pub indent: String,
}

fn default_js_namespace() -> String {
    "quire.rt".to_string()
}

fn default_js_indent() -> String {
    "  ".to_string()
}

fn default_py_module() -> String {
    "quire_rt".to_string()
}

fn default_py_indent() -> String {
    "    ".to_string()
}

impl Default for JavaScriptConfig {
    fn default() -> Self {
        Self {
            runtime_namespace: default_js_namespace(),
            indent: default_js_indent(),
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            runtime_module: default_py_module(),
            indent: default_py_indent(),
        }
    }
}

impl CodegenConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CodegenConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_dotted_identifier(&self.javascript.runtime_namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid JavaScript runtime namespace: '{}'. Must be a dotted identifier (e.g., quire.rt)",
                self.javascript.runtime_namespace
            )));
        }

        if !is_dotted_identifier(&self.python.runtime_module) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid Python runtime module: '{}'. Must be a dotted identifier (e.g., quire_rt)",
                self.python.runtime_module
            )));
        }

        for (backend, indent) in [
            ("javascript", &self.javascript.indent),
            ("python", &self.python.indent),
        ] {
            if !indent.chars().all(|c| c == ' ' || c == '\t') {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid {} indent: {:?}. Must contain only spaces or tabs",
                    backend, indent
                )));
            }
        }

        Ok(())
    }
}

fn is_dotted_identifier(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(is_identifier)
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
