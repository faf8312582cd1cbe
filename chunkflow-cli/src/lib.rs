//! chunkflow CLI library
//!
//! This library provides the command-line interface for splitting oversized
//! text contexts and running them through the chunk processor.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod ops;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
