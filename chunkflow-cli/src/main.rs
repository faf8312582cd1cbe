//! chunkflow command-line entry point

use chunkflow_cli::commands::Commands;
use clap::Parser;

/// Split oversized text contexts into overlapping chunks and process them in parallel
#[derive(Debug, Parser)]
#[command(name = "chunkflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
