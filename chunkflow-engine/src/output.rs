//! Processor output with run metadata

use chunkflow_core::ChunkingStrategy;
use std::time::Duration;

/// Combined value together with what the run looked like
#[derive(Debug, Clone)]
pub struct ProcessingOutput<T> {
    /// Value produced by the combine function
    pub value: T,
    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

/// Metadata about one orchestration run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingMetadata {
    /// Strategy requested by the caller
    pub strategy: ChunkingStrategy,
    /// Chunk size actually used (tokens)
    pub chunk_size: usize,
    /// Number of chunks processed
    pub chunk_count: usize,
    /// Wall-clock duration of the whole run
    pub duration: Duration,
    /// Time spent in the chunk function, per chunk in document order
    pub chunk_timings: Vec<Duration>,
    /// Estimated token count of each chunk in document order
    pub chunk_tokens: Vec<usize>,
}

impl ProcessingMetadata {
    /// Sum of per-chunk processing times
    pub fn total_chunk_time(&self) -> Duration {
        self.chunk_timings.iter().sum()
    }

    /// Index and duration of the slowest chunk
    pub fn slowest_chunk(&self) -> Option<(usize, Duration)> {
        self.chunk_timings
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, timing)| *timing)
    }
}
