//! Generator configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file named by
//! the `config` parameter, then the remaining protoc parameters
//! (`--struct-transformer_opt=key=value,...`).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use struct_transformer::ResolveConfig;

/// How output directories are derived from a schema file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// Directories follow the protobuf package
    #[default]
    Import,

    /// Directories follow the schema file's own location
    #[value(name = "source_relative", alias = "source-relative")]
    SourceRelative,
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output sub-directory the transformers are written into
    pub package: String,

    /// Module path of the custom helper functions, e.g. `crate::helpers`
    pub helper_package: String,

    /// Module root of the prost wire types
    pub proto_root: String,

    /// Module holding the native structures
    pub models_module: String,

    /// Directory `rust_models_file_path` is relative to
    pub models_root: PathBuf,

    pub paths: PathType,
    pub use_package_in_path: bool,

    /// Verbose logging and native structure summaries in the output
    pub debug: bool,

    /// Pretty-print generated sources
    pub format: bool,

    pub scoped_union_names: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: "transform".to_string(),
            helper_package: String::new(),
            proto_root: "crate".to_string(),
            models_module: "crate::models".to_string(),
            models_root: PathBuf::from("."),
            paths: PathType::Import,
            use_package_in_path: true,
            debug: false,
            format: true,
            scoped_union_names: false,
        }
    }
}

/// protoc parameters, parsed as if they were command line flags
#[derive(Parser, Debug, Default)]
#[command(
    name = "struct-transformer",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Parameters {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    package: Option<String>,

    #[arg(long)]
    helper_package: Option<String>,

    #[arg(long)]
    proto_root: Option<String>,

    #[arg(long)]
    models_module: Option<String>,

    #[arg(long)]
    models_root: Option<PathBuf>,

    #[arg(long, value_enum)]
    paths: Option<PathType>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    use_package_in_path: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    debug: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    format: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    scoped_union_names: Option<bool>,
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Build the configuration from the protoc parameter string.
    ///
    /// Keys may use `_` or `-`; a bare key sets a boolean flag.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let params = Parameters::try_parse_from(parameter_args(parameter))
            .with_context(|| format!("Invalid plugin parameter: {parameter:?}"))?;

        let mut config = match &params.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(params);
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.proto_root.trim().is_empty() {
            anyhow::bail!("proto_root cannot be empty");
        }
        if self.models_module.trim().is_empty() {
            anyhow::bail!("models_module cannot be empty");
        }
        if self.package.contains("..") || self.package.starts_with('/') {
            anyhow::bail!("package must be a relative directory, got {:?}", self.package);
        }

        Ok(())
    }

    /// Resolution knobs for the core library
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            scoped_union_names: self.scoped_union_names,
        }
    }

    fn apply(&mut self, params: Parameters) {
        if let Some(v) = params.package {
            self.package = v;
        }
        if let Some(v) = params.helper_package {
            self.helper_package = v;
        }
        if let Some(v) = params.proto_root {
            self.proto_root = v;
        }
        if let Some(v) = params.models_module {
            self.models_module = v;
        }
        if let Some(v) = params.models_root {
            self.models_root = v;
        }
        if let Some(v) = params.paths {
            self.paths = v;
        }
        if let Some(v) = params.use_package_in_path {
            self.use_package_in_path = v;
        }
        if let Some(v) = params.debug {
            self.debug = v;
        }
        if let Some(v) = params.format {
            self.format = v;
        }
        if let Some(v) = params.scoped_union_names {
            self.scoped_union_names = v;
        }
    }
}

/// `a_b=c,d` becomes `["--a-b=c", "--d"]`
fn parameter_args(parameter: &str) -> Vec<String> {
    parameter
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((key, value)) => format!("--{}={value}", key.trim().replace('_', "-")),
            None => format!("--{}", p.replace('_', "-")),
        })
        .collect()
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
