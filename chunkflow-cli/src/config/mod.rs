//! Configuration file support
//!
//! A CLI configuration file has an `[engine]` table, read straight into
//! [`EngineConfig`], and an `[output]` table for presentation settings.
//! Command-line flags override both.

use crate::error::CliError;
use anyhow::{Context, Result};
use chunkflow_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Separator placed between chunk outputs
    pub separator: String,

    /// Drop text repeated by the overlap between neighbouring chunks
    pub merge_overlap: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            merge_overlap: false,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Parse and validate a configuration document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CliConfig =
            toml::from_str(source).map_err(|e| CliError::ConfigError(e.to_string()))?;
        config
            .engine
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load `path` if given, otherwise the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Commented configuration template with the default values
    pub fn template() -> String {
        let defaults = Self::default();
        let engine = &defaults.engine;
        format!(
            r#"# chunkflow configuration

[engine]
# Requested chunk size in tokens when --tokens is not given
default_chunk_size = {chunk_size}
# "fixed" always uses the requested size; "adaptive" learns from past runs
default_strategy = "{strategy}"
# Upper bound on chunks processed at the same time
max_parallelism = {parallelism}
# Adaptive suggestions are clamped into [min_chunk_size, max_chunk_size]
min_chunk_size = {min}
max_chunk_size = {max}
# A recorded size must succeed more often than this to be preferred
success_threshold = {threshold:?}
# Characters counted as one token
chars_per_token = {chars_per_token}

[output]
# Placed between chunk outputs
separator = {separator:?}
# Drop the text each chunk repeats from its predecessor
merge_overlap = {merge_overlap}
pretty_json = {pretty_json}
"#,
            chunk_size = engine.default_chunk_size,
            strategy = engine.default_strategy,
            parallelism = engine.max_parallelism,
            min = engine.min_chunk_size,
            max = engine.max_chunk_size,
            threshold = engine.success_threshold,
            chars_per_token = engine.chars_per_token,
            separator = defaults.output.separator,
            merge_overlap = defaults.output.merge_overlap,
            pretty_json = defaults.output.pretty_json,
        )
    }
}
