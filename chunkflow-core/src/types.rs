//! Chunk data model shared by the splitter, scheduler and orchestrator

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the chunk size for a run is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChunkingStrategy {
    /// Always use the caller-specified size
    Fixed,
    /// Let the adaptive size policy pick from historical outcomes
    #[default]
    Adaptive,
}

impl ChunkingStrategy {
    /// Lowercase name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Fixed => "fixed",
            ChunkingStrategy::Adaptive => "adaptive",
        }
    }

    /// Whether runs with this strategy consult and update the size policy
    pub fn is_adaptive(&self) -> bool {
        matches!(self, ChunkingStrategy::Adaptive)
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(ChunkingStrategy::Fixed),
            "adaptive" => Ok(ChunkingStrategy::Adaptive),
            _ => Err(CoreError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Position and size information attached to every chunk's output
///
/// Created once per chunk by the scheduler and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMetadata {
    index: usize,
    total_chunks: usize,
    token_count: usize,
    strategy: ChunkingStrategy,
}

impl ChunkMetadata {
    /// Create metadata for chunk `index` of `total_chunks`
    pub fn new(
        index: usize,
        total_chunks: usize,
        token_count: usize,
        strategy: ChunkingStrategy,
    ) -> Self {
        debug_assert!(index < total_chunks, "chunk index out of range");
        Self {
            index,
            total_chunks,
            token_count,
            strategy,
        }
    }

    /// Zero-based position of the chunk in the original document
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of chunks produced by the split this chunk came from
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    /// Estimated token count of the chunk text
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Strategy that selected the chunk size
    pub fn strategy(&self) -> ChunkingStrategy {
        self.strategy
    }

    /// Returns true if this is the first chunk
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if this is the last chunk
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total_chunks
    }
}

/// Outcome of processing a single chunk
#[derive(Debug, Clone)]
pub struct ChunkResult<T> {
    /// Output of the chunk function (default value when the chunk failed)
    pub output: T,
    /// Where the chunk sits in the document
    pub metadata: ChunkMetadata,
    /// Wall-clock time spent in the chunk function
    pub processing_time: Duration,
    /// Whether the chunk function succeeded
    pub success: bool,
    /// Failure message for failed chunks
    pub error: Option<String>,
}

impl<T> ChunkResult<T> {
    /// A successful chunk result
    pub fn succeeded(output: T, metadata: ChunkMetadata, processing_time: Duration) -> Self {
        Self {
            output,
            metadata,
            processing_time,
            success: true,
            error: None,
        }
    }

    /// A failed chunk result carrying an empty output
    pub fn failed(
        metadata: ChunkMetadata,
        processing_time: Duration,
        error: impl Into<String>,
    ) -> Self
    where
        T: Default,
    {
        Self {
            output: T::default(),
            metadata,
            processing_time,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Index of the chunk in the original document
    pub fn index(&self) -> usize {
        self.metadata.index()
    }
}
