//! Input abstraction for the processor

use crate::error::{EngineError, Result};

/// Context handed to the processor
///
/// Only text is processed; any other kind is rejected before work starts.
pub enum ContextInput {
    /// Text context
    Text(String),
    /// Raw bytes (not supported)
    Bytes(Vec<u8>),
}

impl std::fmt::Debug for ContextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextInput::Text(text) => f
                .debug_struct("ContextInput::Text")
                .field("length", &text.len())
                .finish(),
            ContextInput::Bytes(bytes) => f
                .debug_struct("ContextInput::Bytes")
                .field("length", &bytes.len())
                .finish(),
        }
    }
}

impl ContextInput {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        ContextInput::Text(text.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ContextInput::Bytes(bytes)
    }

    /// Short name of the input kind
    pub fn kind(&self) -> &'static str {
        match self {
            ContextInput::Text(_) => "text",
            ContextInput::Bytes(_) => "bytes",
        }
    }

    /// The text content, or `UnsupportedInputType` for other kinds
    pub(crate) fn into_text(self) -> Result<String> {
        match self {
            ContextInput::Text(text) => Ok(text),
            other => Err(EngineError::UnsupportedInputType { kind: other.kind() }),
        }
    }
}

impl From<String> for ContextInput {
    fn from(text: String) -> Self {
        ContextInput::Text(text)
    }
}

impl From<&str> for ContextInput {
    fn from(text: &str) -> Self {
        ContextInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ContextInput {
    fn from(bytes: Vec<u8>) -> Self {
        ContextInput::Bytes(bytes)
    }
}
