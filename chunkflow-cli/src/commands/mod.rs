//! CLI command implementations

use crate::ops::ChunkOperation;
use anyhow::Result;
use clap::{Subcommand, ValueEnum};

pub mod generate_config;
pub mod process;
pub mod split;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the chunks a document is split into
    Split(split::SplitArgs),

    /// Run a chunk operation over documents and combine the results
    Process(process::ProcessArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List built-in chunk operations
    Ops,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Split(args) => args.execute(),
            Commands::Process(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
        }
    }
}

impl ListCommands {
    fn execute(self) {
        match self {
            ListCommands::Ops => {
                println!("Chunk operations:");
                for op in ChunkOperation::value_variants() {
                    println!("  {:<12} {}", op.name(), op.description());
                }
            }
            ListCommands::Formats => {
                println!("Output formats:");
                println!("  split:   text, json, markdown");
                println!("  process: text, json");
            }
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over the level derived from `-v`.
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A second initialization (e.g. from tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_commands_debug_format() {
        let cmd = Commands::Validate(validate::ValidateArgs {
            config: PathBuf::from("chunkflow.toml"),
        });
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Validate"));
        assert!(debug_str.contains("chunkflow.toml"));

        let list_cmd = Commands::List {
            subcommand: ListCommands::Ops,
        };
        assert!(format!("{list_cmd:?}").contains("Ops"));
    }

    #[test]
    fn test_list_commands_run() {
        assert!(Commands::List {
            subcommand: ListCommands::Formats
        }
        .execute()
        .is_ok());
    }
}
