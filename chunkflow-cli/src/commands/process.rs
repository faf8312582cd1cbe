//! Process command implementation

use super::init_logging;
use crate::{
    config::CliConfig,
    error::CliError,
    input::{resolve_patterns, FileReader},
    ops::ChunkOperation,
    output::{open_writer, OutputWriter},
    progress::ProgressReporter,
};
use anyhow::Result;
use chunkflow_core::Splitter;
use chunkflow_engine::{
    AdaptiveSizePolicy, BoxError, CancellationToken, ChunkHandler, ChunkProcessor,
    ChunkingStrategy, JoinCombiner, OverlapMergeCombiner, ProcessingOutput, ResultCombiner,
};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Requested chunk size in tokens (default: from config, 512)
    #[arg(short, long)]
    pub tokens: Option<usize>,

    /// Chunking strategy: fixed or adaptive (default: from config, adaptive)
    #[arg(short, long)]
    pub strategy: Option<ChunkingStrategy>,

    /// Operation applied to every chunk
    #[arg(long, value_enum, default_value = "identity")]
    pub op: ChunkOperation,

    /// Separator placed between chunk outputs
    #[arg(long)]
    pub separator: Option<String>,

    /// Drop the text each chunk repeats from its predecessor
    #[arg(long)]
    pub merge_overlap: bool,

    /// Maximum number of chunks processed at the same time
    #[arg(long)]
    pub threads: Option<usize>,

    /// Cancel processing after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ProcessFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the chunk size statistics after processing
    #[arg(long)]
    pub stats: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output formats for the process command
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProcessFormat {
    /// Combined output only
    Text,
    /// Combined output with run metadata
    Json,
}

/// Result for one processed document
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    output: String,
    strategy: ChunkingStrategy,
    chunk_size: usize,
    chunk_count: usize,
    duration_ms: f64,
    chunk_timings_ms: Vec<f64>,
    chunk_tokens: Vec<usize>,
}

impl FileReport {
    fn new(path: &Path, output: ProcessingOutput<String>) -> Self {
        let metadata = output.metadata;
        Self {
            file: path.display().to_string(),
            output: output.value,
            strategy: metadata.strategy,
            chunk_size: metadata.chunk_size,
            chunk_count: metadata.chunk_count,
            duration_ms: metadata.duration.as_secs_f64() * 1000.0,
            chunk_timings_ms: metadata
                .chunk_timings
                .iter()
                .map(|timing| timing.as_secs_f64() * 1000.0)
                .collect(),
            chunk_tokens: metadata.chunk_tokens,
        }
    }
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting chunk processing");
        log::debug!("Arguments: {:?}", self);

        let config = self.resolve_config()?;
        let tokens = self.tokens.unwrap_or(config.engine.default_chunk_size);
        let strategy = self.strategy.unwrap_or(config.engine.default_strategy);

        let files = resolve_patterns(&self.input)?;
        let processor = self.build_processor(&config, tokens)?;
        let cancellation = self.timeout_secs.map(start_deadline);

        log::info!(
            "Processing {} files with {} strategy, {} workers",
            files.len(),
            strategy,
            processor.parallelism()
        );

        let mut reporter = ProgressReporter::new(self.quiet);
        reporter.init_files(files.len() as u64);

        let mut reports = Vec::with_capacity(files.len());
        for path in &files {
            let text = FileReader::read_text(path)?;
            log::debug!("{}: {} bytes", path.display(), FileReader::file_size(path)?);

            let output = processor
                .process_large_context_with_metadata(&text, tokens, strategy, cancellation.as_ref())
                .map_err(|e| CliError::ProcessingError(format!("{}: {e}", path.display())))?;

            reporter.file_completed(&path.display().to_string(), output.metadata.chunk_count);
            reports.push(FileReport::new(path, output));
        }
        reporter.finish();

        let mut writer = open_writer(self.output.as_deref())?;
        match self.format {
            ProcessFormat::Text => write_text(&mut writer, &reports)?,
            ProcessFormat::Json => write_json(&mut writer, &reports, config.output.pretty_json)?,
        }
        writer.flush()?;

        if self.stats {
            print_stats(processor.policy());
        }

        Ok(())
    }

    /// Load the config file and apply command-line overrides
    fn resolve_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;

        if let Some(tokens) = self.tokens {
            if tokens == 0 {
                return Err(CliError::InvalidArgument(
                    "--tokens must be greater than 0".to_string(),
                )
                .into());
            }
            config.engine.default_chunk_size = tokens;
        }
        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(CliError::InvalidArgument(
                    "--threads must be greater than 0".to_string(),
                )
                .into());
            }
            config.engine.max_parallelism = threads;
        }
        if let Some(strategy) = self.strategy {
            config.engine.default_strategy = strategy;
        }
        if let Some(separator) = &self.separator {
            config.output.separator = separator.clone();
        }
        config.output.merge_overlap |= self.merge_overlap;

        Ok(config)
    }

    fn build_processor(&self, config: &CliConfig, tokens: usize) -> Result<ChunkProcessor<String>> {
        let op = self.op;
        let handler: Arc<dyn ChunkHandler> =
            Arc::new(move |chunk: &str| -> Result<String, BoxError> { Ok(op.apply(chunk)) });

        let combiner: Arc<dyn ResultCombiner<String>> =
            if config.output.merge_overlap && op.preserves_text() {
                // Fallback bound for outputs that no longer match the reported overlap
                let splitter = Splitter::new(config.engine.splitter_config())?;
                let largest = tokens.max(config.engine.max_chunk_size);
                Arc::new(OverlapMergeCombiner::new(splitter.overlap_chars(largest)))
            } else {
                if config.output.merge_overlap {
                    log::warn!("--merge-overlap ignored: {} does not keep chunk text", op.name());
                }
                Arc::new(JoinCombiner::new(config.output.separator.clone()))
            };

        let processor = ChunkProcessor::from_parts(handler, combiner, config.engine.clone())
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(processor)
    }
}

/// Cancel the returned token once `secs` have passed
fn start_deadline(secs: u64) -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(secs));
        log::debug!("deadline of {secs}s reached, cancelling");
        trigger.cancel();
    });
    token
}

fn write_text(writer: &mut OutputWriter, reports: &[FileReport]) -> Result<()> {
    let with_headers = reports.len() > 1;
    for report in reports {
        if with_headers {
            writeln!(writer, "==> {} <==", report.file)?;
        }
        writeln!(writer, "{}", report.output)?;
    }
    Ok(())
}

fn write_json(writer: &mut OutputWriter, reports: &[FileReport], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, reports)?;
    } else {
        serde_json::to_writer(&mut *writer, reports)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn print_stats(policy: &AdaptiveSizePolicy) {
    let snapshot = policy.snapshot();
    if snapshot.is_empty() {
        eprintln!("No chunk size statistics recorded (fixed strategy)");
        return;
    }

    eprintln!("{:>10} {:>9} {:>9} {:>8}", "size", "successes", "failures", "rate");
    for stats in snapshot {
        eprintln!(
            "{:>10} {:>9} {:>9} {:>7.1}%",
            stats.chunk_size,
            stats.success_count,
            stats.failure_count,
            stats.success_rate() * 100.0
        );
    }
}
