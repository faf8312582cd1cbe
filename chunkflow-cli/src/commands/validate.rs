//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::from_file(&self.config) {
            Ok(config) => {
                let engine = &config.engine;
                println!("✓ Configuration is valid!");
                println!(
                    "  Default chunk size: {} tokens ({})",
                    engine.default_chunk_size, engine.default_strategy
                );
                println!(
                    "  Adaptive bounds: {}..={} tokens, threshold {}",
                    engine.min_chunk_size, engine.max_chunk_size, engine.success_threshold
                );
                println!("  Worker threads: {}", engine.worker_threads());
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }
}
