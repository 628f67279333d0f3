//! Lowering configuration
//!
//! Names of the runtime helpers the lowering emits calls to, and the
//! convention used to turn methods into plain functions. Loaded from TOML:
//!
//! ```toml
//! assert_not_none = "assert_not_none"
//! index_out_of_bounds = "index_out_of_bounds"
//! init_method = "__init__"
//! mangle_separator = "$"
//! validate = true
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Lowering options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LowerConfig {
    /// Runtime check called on every method-call receiver
    pub assert_not_none: String,
    /// Runtime check called with `(length, index)` before list element access
    pub index_out_of_bounds: String,
    /// Method invoked on every freshly constructed object
    pub init_method: String,
    /// Separator between class and method name in mangled call targets
    pub mangle_separator: String,
    /// Validate the lowered IR before returning it
    pub validate: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            assert_not_none: "assert_not_none".to_string(),
            index_out_of_bounds: "index_out_of_bounds".to_string(),
            init_method: "__init__".to_string(),
            mangle_separator: "$".to_string(),
            validate: false,
        }
    }
}

impl LowerConfig {
    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Mangled call target for `method` of `class`, e.g. `Foo$bar`
    pub fn mangle(&self, class: &str, method: &str) -> String {
        format!("{}{}{}", class, self.mangle_separator, method)
    }
}
