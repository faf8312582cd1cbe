//! Core error types (deterministic only)

use thiserror::Error;

/// Errors raised by the deterministic building blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A configuration value is out of range
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },

    /// A chunking strategy name could not be parsed
    #[error("unknown chunking strategy '{name}' (expected 'fixed' or 'adaptive')")]
    UnknownStrategy {
        /// The name that was given
        name: String,
    },
}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidConfig {
            reason: "min_chunk_size must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_chunk_size must be at least 1"
        );

        let err = CoreError::UnknownStrategy {
            name: "greedy".to_string(),
        };
        assert!(err.to_string().contains("'greedy'"));
    }
}
