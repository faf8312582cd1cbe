//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Configuration error
    ConfigError(String),
    /// Processing error from the engine
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CliError::FileNotFound("notes.txt".to_string()).to_string(),
            "File not found: notes.txt"
        );
        assert_eq!(
            CliError::InvalidPattern("[docs".to_string()).to_string(),
            "Invalid file pattern: [docs"
        );
        assert_eq!(
            CliError::InvalidArgument("--tokens must be greater than 0".to_string()).to_string(),
            "Invalid argument: --tokens must be greater than 0"
        );
        assert_eq!(
            CliError::ConfigError("bad threshold".to_string()).to_string(),
            "Configuration error: bad threshold"
        );
        assert_eq!(
            CliError::ProcessingError("1 of 5 chunks failed".to_string()).to_string(),
            "Processing error: 1 of 5 chunks failed"
        );
    }

    #[test]
    fn test_converts_into_anyhow() {
        let result: CliResult<()> = Err(CliError::ConfigError("missing".to_string()).into());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert_eq!(err.to_string(), "Configuration error: missing");
    }
}
