//! Plain text output formatter

use super::{ChunkRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - a header line followed by the chunk text
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()> {
        writeln!(
            self.writer,
            "--- {} [{}/{}] chars {}..{} ~{} tokens ---",
            chunk.source,
            chunk.index + 1,
            chunk.total,
            chunk.start,
            chunk.end,
            chunk.tokens
        )?;
        writeln!(self.writer, "{}", chunk.text)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{record, SharedBuffer};

    #[test]
    fn test_text_layout() {
        let buffer = SharedBuffer::default();
        let mut formatter = TextFormatter::new(buffer.clone());
        formatter.format_chunk(&record(0, 2, "First chunk.")).unwrap();
        formatter.format_chunk(&record(1, 2, "Second chunk.")).unwrap();
        formatter.finish().unwrap();

        let output = buffer.contents();
        assert!(output.starts_with("--- doc.txt [1/2] chars 0..12 ~3 tokens ---\nFirst chunk.\n"));
        assert!(output.contains("[2/2]"));
    }
}
