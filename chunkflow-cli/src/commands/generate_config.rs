//! Generate config command implementation

use crate::{config::CliConfig, error::CliError};
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            return Err(CliError::InvalidArgument(format!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            ))
            .into());
        }

        fs::write(&self.output, CliConfig::template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!(
            "✓ Configuration template written to {}",
            self.output.display()
        );
        println!();
        println!("Next steps:");
        println!("1. Edit the engine and output settings");
        println!("2. Validate your configuration:");
        println!("   chunkflow validate -c {}", self.output.display());
        println!("3. Use it for processing:");
        println!(
            "   chunkflow process -i input.txt -c {}",
            self.output.display()
        );

        Ok(())
    }
}
