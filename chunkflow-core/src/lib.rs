//! Deterministic building blocks for adaptive chunked map-reduce
//!
//! This crate holds the parts of the chunk processor that involve no threads
//! and no I/O:
//!
//! - **Splitter**: overlap-aware splitting that prefers sentence and paragraph
//!   boundaries
//! - **Adaptive size policy**: online success/failure statistics per chunk size
//! - **Data model**: chunk metadata, per-chunk results, chunking strategies
//! - **Token estimation**: the character-ratio heuristic behind a trait
//!
//! Scheduling, cancellation and orchestration live in `chunkflow-engine`.
//!
//! # Example
//!
//! ```rust
//! use chunkflow_core::{split, AdaptiveSizePolicy};
//!
//! let text = "First sentence. Second sentence. ".repeat(40);
//! let chunks = split(&text, 64);
//! assert!(chunks.len() > 1);
//!
//! let policy = AdaptiveSizePolicy::default();
//! policy.record(300, true);
//! assert_eq!(policy.suggest(512), 300);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod policy;
pub mod splitter;
pub mod token;
pub mod types;

pub use error::{CoreError, Result};
pub use policy::{AdaptiveSizePolicy, PolicyConfig, SizeStats};
pub use splitter::{overlap_lengths, split, Splitter, SplitterConfig, TextChunk};
pub use token::{estimate_token_count, CharRatioEstimator, TokenEstimator};
pub use types::{ChunkMetadata, ChunkResult, ChunkingStrategy};

/// Approximate number of characters in one token
pub const CHARS_PER_TOKEN: usize = 4;

/// Smallest chunk size (in tokens) the adaptive policy will default to
pub const MIN_CHUNK_SIZE: usize = 256;

/// Largest chunk size (in tokens) the adaptive policy will default to
pub const MAX_CHUNK_SIZE: usize = 1024;

/// Success rate a recorded size must exceed before the policy prefers it
pub const SUCCESS_THRESHOLD: f64 = 0.8;
