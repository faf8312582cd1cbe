//! Map-reduce orchestration for oversized text contexts
//!
//! This crate ties the deterministic pieces from `chunkflow-core` into a
//! processor that splits a context, runs a caller-supplied function over every
//! chunk on a bounded worker pool, and reduces the ordered outputs with a
//! caller-supplied combiner. In adaptive mode the chunk size is chosen from,
//! and fed back into, the processor's size policy.
//!
//! # Example
//!
//! ```rust
//! use chunkflow_engine::{BoxError, ChunkProcessor, ChunkingStrategy};
//!
//! let processor = ChunkProcessor::new(
//!     |chunk: &str| -> Result<String, BoxError> { Ok(chunk.to_uppercase()) },
//!     |outputs: Vec<String>| -> Result<String, BoxError> { Ok(outputs.join("\n")) },
//! )
//! .unwrap();
//!
//! let text = "Short context. ".repeat(10);
//! let result = processor
//!     .process_large_context(&text, 512, ChunkingStrategy::Fixed, None)
//!     .unwrap();
//! assert!(result.starts_with("SHORT CONTEXT."));
//! ```

#![warn(missing_docs)]

pub mod cancel;
pub mod combiner;
pub mod config;
pub mod error;
pub mod handler;
pub mod input;
pub mod output;
pub mod processor;
pub mod scheduler;

// Re-export key types
pub use cancel::CancellationToken;
pub use combiner::{Combiner, JoinCombiner, OverlapMergeCombiner};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{EngineError, Result};
pub use handler::{BoxError, ChunkHandler, ResultCombiner};
pub use input::ContextInput;
pub use output::{ProcessingMetadata, ProcessingOutput};
pub use processor::ChunkProcessor;
pub use scheduler::ChunkScheduler;

// Re-export from core for convenience
pub use chunkflow_core::{
    estimate_token_count, split, AdaptiveSizePolicy, ChunkMetadata, ChunkResult,
    ChunkingStrategy, SizeStats, TokenEstimator,
};
