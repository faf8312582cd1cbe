//! JSON output formatter

use super::{ChunkRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs all chunks as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    chunks: Vec<ChunkRecord>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunks: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()> {
        self.chunks.push(chunk.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.chunks)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
