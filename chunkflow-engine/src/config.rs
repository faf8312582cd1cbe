//! Engine configuration
//!
//! Configuration can be built in code with [`EngineConfig::builder`] or
//! loaded from TOML. Missing keys fall back to the defaults below.
//!
//! ```toml
//! default_chunk_size = 512
//! default_strategy = "adaptive"
//! max_parallelism = 4
//! min_chunk_size = 256
//! max_chunk_size = 1024
//! success_threshold = 0.8
//! chars_per_token = 4
//! ```

use crate::error::{EngineError, Result};
use chunkflow_core::{
    ChunkingStrategy, PolicyConfig, SplitterConfig, CHARS_PER_TOKEN, MAX_CHUNK_SIZE,
    MIN_CHUNK_SIZE, SUCCESS_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration constants
pub mod defaults {
    /// Requested chunk size when the caller does not give one (tokens)
    pub const CHUNK_SIZE: usize = 512;

    /// Upper bound on concurrently processed chunks
    pub const MAX_PARALLELISM: usize = 4;
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Requested chunk size for `process_with_defaults` (tokens)
    pub default_chunk_size: usize,
    /// Strategy for `process_with_defaults`
    pub default_strategy: ChunkingStrategy,
    /// Cap on worker threads; the pool uses `min(cpus, max_parallelism)`
    pub max_parallelism: usize,
    /// Lower clamp for adaptive size suggestions (tokens)
    pub min_chunk_size: usize,
    /// Upper clamp for adaptive size suggestions (tokens)
    pub max_chunk_size: usize,
    /// Success rate a recorded size must exceed to be preferred
    pub success_threshold: f64,
    /// Characters per token for budgets and estimates
    pub chars_per_token: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: defaults::CHUNK_SIZE,
            default_strategy: ChunkingStrategy::Adaptive,
            max_parallelism: defaults::MAX_PARALLELISM,
            min_chunk_size: MIN_CHUNK_SIZE,
            max_chunk_size: MAX_CHUNK_SIZE,
            success_threshold: SUCCESS_THRESHOLD,
            chars_per_token: CHARS_PER_TOKEN,
        }
    }
}

impl EngineConfig {
    /// Create a configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(source).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_chunk_size == 0 {
            return Err(EngineError::Config(
                "default_chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.max_parallelism == 0 {
            return Err(EngineError::Config(
                "max_parallelism must be greater than 0".to_string(),
            ));
        }

        self.splitter_config().validate()?;
        self.policy_config().validate()?;
        Ok(())
    }

    /// Worker count: available CPUs capped by `max_parallelism`
    pub fn worker_threads(&self) -> usize {
        num_cpus::get().min(self.max_parallelism).max(1)
    }

    /// Policy bounds derived from this configuration
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            min_chunk_size: self.min_chunk_size,
            max_chunk_size: self.max_chunk_size,
            success_threshold: self.success_threshold,
        }
    }

    /// Splitter settings derived from this configuration
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig {
            chars_per_token: self.chars_per_token,
        }
    }
}

/// Fluent builder for [`EngineConfig`]
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default requested chunk size (tokens)
    pub fn default_chunk_size(mut self, tokens: usize) -> Self {
        self.config.default_chunk_size = tokens;
        self
    }

    /// Sets the default strategy
    pub fn default_strategy(mut self, strategy: ChunkingStrategy) -> Self {
        self.config.default_strategy = strategy;
        self
    }

    /// Sets the cap on worker threads
    pub fn max_parallelism(mut self, threads: usize) -> Self {
        self.config.max_parallelism = threads;
        self
    }

    /// Sets the adaptive policy clamp range (tokens)
    pub fn chunk_size_bounds(mut self, min: usize, max: usize) -> Self {
        self.config.min_chunk_size = min;
        self.config.max_chunk_size = max;
        self
    }

    /// Sets the success rate a size must exceed to be preferred
    pub fn success_threshold(mut self, threshold: f64) -> Self {
        self.config.success_threshold = threshold;
        self
    }

    /// Sets the characters-per-token ratio
    pub fn chars_per_token(mut self, chars: usize) -> Self {
        self.config.chars_per_token = chars;
        self
    }

    /// Builds the configuration, validating parameters
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
