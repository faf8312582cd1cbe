//! Built-in chunk operations
//!
//! The library leaves the per-chunk work to the caller; from the command line
//! one of these deterministic operations stands in for it.

use clap::ValueEnum;

/// Operation applied to every chunk by the `process` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChunkOperation {
    /// Pass the chunk through unchanged
    Identity,
    /// Convert the chunk to upper case
    Uppercase,
    /// Convert the chunk to lower case
    Lowercase,
    /// Replace the chunk with its word count
    WordCount,
}

impl ChunkOperation {
    /// Apply the operation to one chunk
    pub fn apply(self, chunk: &str) -> String {
        match self {
            ChunkOperation::Identity => chunk.to_string(),
            ChunkOperation::Uppercase => chunk.to_uppercase(),
            ChunkOperation::Lowercase => chunk.to_lowercase(),
            ChunkOperation::WordCount => chunk.split_whitespace().count().to_string(),
        }
    }

    /// Name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            ChunkOperation::Identity => "identity",
            ChunkOperation::Uppercase => "uppercase",
            ChunkOperation::Lowercase => "lowercase",
            ChunkOperation::WordCount => "word-count",
        }
    }

    /// One-line description for `list ops`
    pub fn description(self) -> &'static str {
        match self {
            ChunkOperation::Identity => "Pass each chunk through unchanged",
            ChunkOperation::Uppercase => "Convert each chunk to upper case",
            ChunkOperation::Lowercase => "Convert each chunk to lower case",
            ChunkOperation::WordCount => "Replace each chunk with its word count",
        }
    }

    /// Whether outputs still contain the chunk text (and its overlap)
    pub fn preserves_text(self) -> bool {
        !matches!(self, ChunkOperation::WordCount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(ChunkOperation::Identity.apply("Mixed Case."), "Mixed Case.");
        assert_eq!(ChunkOperation::Uppercase.apply("Mixed Case."), "MIXED CASE.");
        assert_eq!(ChunkOperation::Lowercase.apply("Mixed Case."), "mixed case.");
        assert_eq!(ChunkOperation::WordCount.apply("one two\nthree "), "3");
    }

    #[test]
    fn test_names_match_value_enum() {
        for op in ChunkOperation::value_variants() {
            let parsed = ChunkOperation::from_str(op.name(), false).unwrap();
            assert_eq!(parsed, *op);
        }
        assert!(!ChunkOperation::WordCount.preserves_text());
    }
}
