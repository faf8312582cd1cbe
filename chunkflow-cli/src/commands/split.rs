//! Split command implementation

use super::init_logging;
use crate::{
    error::CliError,
    input::{resolve_patterns, FileReader},
    output::{
        open_writer, ChunkRecord, JsonFormatter, MarkdownFormatter, OutputFormatter,
        TextFormatter,
    },
};
use anyhow::Result;
use chunkflow_core::{CharRatioEstimator, Splitter, SplitterConfig, TokenEstimator, CHARS_PER_TOKEN};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the split command
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Target chunk size in tokens
    #[arg(short, long, default_value_t = 512)]
    pub tokens: usize,

    /// Characters counted as one token
    #[arg(long, default_value_t = CHARS_PER_TOKEN)]
    pub chars_per_token: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: SplitFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output formats for the split command
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SplitFormat {
    /// Header line and text per chunk
    Text,
    /// JSON array of chunks with offsets
    Json,
    /// Markdown section per chunk
    Markdown,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        if self.tokens == 0 {
            return Err(
                CliError::InvalidArgument("--tokens must be greater than 0".to_string()).into(),
            );
        }

        let splitter = Splitter::new(SplitterConfig {
            chars_per_token: self.chars_per_token,
        })?;
        let estimator = CharRatioEstimator::new(self.chars_per_token);
        let files = resolve_patterns(&self.input)?;

        let writer = open_writer(self.output.as_deref())?;
        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            SplitFormat::Text => Box::new(TextFormatter::new(writer)),
            SplitFormat::Json => Box::new(JsonFormatter::new(writer)),
            SplitFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for path in &files {
            let text = FileReader::read_text(path)?;
            let chunks = splitter.split_with_spans(&text, self.tokens);
            log::info!("{}: {} chunks", path.display(), chunks.len());
            if chunks.is_empty() {
                log::warn!("{} contains no text", path.display());
            }

            let total = chunks.len();
            for (index, chunk) in chunks.into_iter().enumerate() {
                formatter.format_chunk(&ChunkRecord {
                    source: path.display().to_string(),
                    index,
                    total,
                    start: chunk.start,
                    end: chunk.end,
                    tokens: estimator.estimate(&chunk.content),
                    text: chunk.content,
                })?;
            }
        }

        formatter.finish()
    }
}
