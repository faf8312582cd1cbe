//! Markdown output formatter

use super::{ChunkRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - one section per chunk
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    chunk_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()> {
        self.chunk_count += 1;
        writeln!(
            self.writer,
            "## {} chunk {}/{}",
            chunk.source,
            chunk.index + 1,
            chunk.total
        )?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "*Characters {}..{}, ~{} tokens*",
            chunk.start, chunk.end, chunk.tokens
        )?;
        writeln!(self.writer)?;
        for line in chunk.text.lines() {
            writeln!(self.writer, "> {line}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total chunks: {}*", self.chunk_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
