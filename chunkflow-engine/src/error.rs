//! Engine error types

use chunkflow_core::CoreError;
use thiserror::Error;

/// Orchestration-level failures surfaced to the caller
///
/// Per-chunk failures never appear here individually; the scheduler records
/// them in the chunk results and the orchestrator reports them in aggregate.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input was not text
    #[error("only string input is currently supported (got {kind})")]
    UnsupportedInputType {
        /// Kind of input that was rejected
        kind: &'static str,
    },

    /// The splitter produced no chunks (empty or whitespace-only context)
    #[error("failed to split context into chunks")]
    SplitFailure,

    /// At least one chunk failed, so the run produced no result
    #[error("{failed} of {total} chunks failed to process (chunks {failed_indices:?}): {first_error}")]
    ChunkFailure {
        /// Number of failed chunks
        failed: usize,
        /// Number of chunks in the run
        total: usize,
        /// Indices of the failed chunks in document order
        failed_indices: Vec<usize>,
        /// Message of the first failed chunk
        first_error: String,
    },

    /// The combine function failed
    #[error("failed to combine chunk results: {reason}")]
    CombineFailure {
        /// Message from the combine function
        reason: String,
    },

    /// The cancellation token fired before the run completed
    #[error("processing was cancelled")]
    Cancelled,

    /// The worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Invalid engine configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Core building block error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether the error came from the cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::SplitFailure.to_string(),
            "failed to split context into chunks"
        );
        assert_eq!(
            EngineError::ChunkFailure {
                failed: 1,
                total: 5,
                failed_indices: vec![2],
                first_error: "model rejected chunk".to_string(),
            }
            .to_string(),
            "1 of 5 chunks failed to process (chunks [2]): model rejected chunk"
        );
        assert_eq!(
            EngineError::Cancelled.to_string(),
            "processing was cancelled"
        );
        assert!(EngineError::UnsupportedInputType { kind: "bytes" }
            .to_string()
            .starts_with("only string input is currently supported"));
    }

    #[test]
    fn test_core_error_conversion() {
        let core = CoreError::UnknownStrategy {
            name: "x".to_string(),
        };
        let err: EngineError = core.into();
        assert!(matches!(err, EngineError::Core(_)));
        assert!(!err.is_cancelled());
        assert!(EngineError::Cancelled.is_cancelled());
    }
}
