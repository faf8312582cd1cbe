//! Output formatting for the `split` command

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// One chunk as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct ChunkRecord {
    /// File the chunk came from
    pub source: String,
    /// Zero-based chunk index
    pub index: usize,
    /// Number of chunks in the file
    pub total: usize,
    /// Character offset where the window starts
    pub start: usize,
    /// Character offset one past the end of the window
    pub end: usize,
    /// Estimated token count
    pub tokens: usize,
    /// Chunk text
    pub text: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single chunk
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Destination for command output
pub type OutputWriter = Box<dyn Write + Send + Sync>;

/// Open `path` for writing, or stdout when no path is given
pub fn open_writer(path: Option<&Path>) -> Result<OutputWriter> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
