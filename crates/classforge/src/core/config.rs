//! Generator configuration
//!
//! Loaded from a JSON document; every field is optional.
//!
//! ```json
//! {
//!   "package": "com.example.model",
//!   "generate": { "default_ctor": true, "full_arg_ctor": true,
//!                 "equal_hashcode": true, "to_string": false },
//!   "encapsulate_all_props": false,
//!   "targets": {
//!     "java": { "imports": { "java.util": ["List", "Map"] } },
//!     "sql":  { "dialect": "postgresql", "single_script": true, "filename": "schema.sql" }
//!   }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

pub const DEFAULT_DIALECT: &str = "ansi";
pub const DEFAULT_SCRIPT_NAME: &str = "schema.sql";

/// Switches for optional member synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub default_ctor: bool,
    pub full_arg_ctor: bool,
    pub equal_hashcode: bool,
    pub to_string: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            default_ctor: true,
            full_arg_ctor: true,
            equal_hashcode: false,
            to_string: false,
        }
    }
}

/// Options scoped to one backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Module or header name to an optional list of imported symbols
    pub imports: IndexMap<String, Option<Vec<String>>>,
    /// SQL dialect name, relational target only
    pub dialect: Option<String>,
    /// Write every table into one script
    pub single_script: bool,
    /// Script name used with `single_script`
    pub filename: Option<String>,
}

/// Top-level configuration shared by every backend in a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Namespace or package prefix for backends that support one
    pub package: Option<String>,
    pub generate: GenerateOptions,
    /// Force every property private and give it accessors
    pub encapsulate_all_props: bool,
    pub targets: IndexMap<String, TargetConfig>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Invalid generator configuration")
    }

    /// Read and parse a configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_generate(mut self, generate: GenerateOptions) -> Self {
        self.generate = generate;
        self
    }

    pub fn with_target(mut self, name: impl Into<String>, target: TargetConfig) -> Self {
        self.targets.insert(name.into(), target);
        self
    }

    /// Non-empty package name, if any
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    /// Configured imports for a backend, in declaration order
    pub fn imports_for(&self, name: &str) -> Vec<(&str, Option<&[String]>)> {
        self.target(name)
            .map(|t| {
                t.imports
                    .iter()
                    .map(|(module, symbols)| (module.as_str(), symbols.as_deref()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dialect name for the relational backend
    pub fn dialect_name(&self, target: &str) -> &str {
        self.target(target)
            .and_then(|t| t.dialect.as_deref())
            .unwrap_or(DEFAULT_DIALECT)
    }
}
