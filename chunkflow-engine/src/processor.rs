//! Split / map / reduce orchestration

use crate::{
    cancel::CancellationToken,
    combiner::Combiner,
    config::EngineConfig,
    error::{EngineError, Result},
    handler::{BoxError, ChunkHandler, ResultCombiner},
    input::ContextInput,
    output::{ProcessingMetadata, ProcessingOutput},
    scheduler::ChunkScheduler,
};
use chunkflow_core::{
    overlap_lengths, AdaptiveSizePolicy, CharRatioEstimator, ChunkingStrategy, Splitter,
    TokenEstimator,
};
use std::sync::Arc;
use std::time::Instant;

/// Processor for contexts too large to handle in one piece
///
/// Each call selects a chunk size, splits the context, runs the chunk
/// function over every chunk in parallel and combines the ordered outputs.
/// The result is all-or-nothing: a single failed chunk fails the call.
///
/// The size policy is owned by the processor, so sharing one processor
/// (for example behind an `Arc`) lets adaptive runs learn from each other.
pub struct ChunkProcessor<T> {
    handler: Arc<dyn ChunkHandler>,
    combiner: Combiner<T>,
    scheduler: ChunkScheduler,
    policy: AdaptiveSizePolicy,
    splitter: Splitter,
    config: EngineConfig,
}

impl<T> std::fmt::Debug for ChunkProcessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkProcessor")
            .field("scheduler", &self.scheduler)
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> ChunkProcessor<T> {
    /// Create a processor with the default configuration
    pub fn new<P, C>(process: P, combine: C) -> Result<Self>
    where
        P: Fn(&str) -> std::result::Result<String, BoxError> + Send + Sync + 'static,
        C: Fn(Vec<String>) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::with_config(EngineConfig::default(), process, combine)
    }

    /// Create a processor with a custom configuration
    pub fn with_config<P, C>(config: EngineConfig, process: P, combine: C) -> Result<Self>
    where
        P: Fn(&str) -> std::result::Result<String, BoxError> + Send + Sync + 'static,
        C: Fn(Vec<String>) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(process), Arc::new(combine), config)
    }

    /// Create a processor from trait objects
    pub fn from_parts(
        handler: Arc<dyn ChunkHandler>,
        combiner: Arc<dyn ResultCombiner<T>>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let scheduler = ChunkScheduler::new(config.worker_threads())?
            .with_estimator(Arc::new(CharRatioEstimator::new(config.chars_per_token)));
        let policy = AdaptiveSizePolicy::new(config.policy_config())?;
        let splitter = Splitter::new(config.splitter_config())?;

        log::debug!(
            "created chunk processor with {} workers",
            scheduler.thread_count()
        );

        Ok(Self {
            handler,
            combiner: Combiner::new(combiner),
            scheduler,
            policy,
            splitter,
            config,
        })
    }

    /// Replace the token estimator used for chunk metadata
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.scheduler = self.scheduler.with_estimator(estimator);
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The size policy shared by every call on this processor
    pub fn policy(&self) -> &AdaptiveSizePolicy {
        &self.policy
    }

    /// Number of chunks processed concurrently
    pub fn parallelism(&self) -> usize {
        self.scheduler.thread_count()
    }

    /// Process `context` and return the combined value
    pub fn process_large_context(
        &self,
        context: &str,
        max_chunk_size_tokens: usize,
        strategy: ChunkingStrategy,
        cancellation: Option<&CancellationToken>,
    ) -> Result<T> {
        self.process_large_context_with_metadata(
            context,
            max_chunk_size_tokens,
            strategy,
            cancellation,
        )
        .map(|output| output.value)
    }

    /// Process `context` with the configured default size and strategy
    pub fn process_with_defaults(&self, context: &str) -> Result<T> {
        self.process_large_context(
            context,
            self.config.default_chunk_size,
            self.config.default_strategy,
            None,
        )
    }

    /// Process a [`ContextInput`], rejecting anything that is not text
    pub fn process_input(
        &self,
        input: ContextInput,
        max_chunk_size_tokens: usize,
        strategy: ChunkingStrategy,
        cancellation: Option<&CancellationToken>,
    ) -> Result<T> {
        let text = input.into_text()?;
        self.process_large_context(&text, max_chunk_size_tokens, strategy, cancellation)
    }

    /// Process `context` and return the combined value with run metadata
    pub fn process_large_context_with_metadata(
        &self,
        context: &str,
        max_chunk_size_tokens: usize,
        strategy: ChunkingStrategy,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ProcessingOutput<T>> {
        let started = Instant::now();

        let chunk_size = self.select_chunk_size(max_chunk_size_tokens, strategy);
        log::debug!(
            "processing {} chars with {} strategy at {} tokens per chunk",
            context.chars().count(),
            strategy,
            chunk_size
        );

        let spans = self.splitter.split_with_spans(context, chunk_size);
        if spans.is_empty() {
            return Err(EngineError::SplitFailure);
        }
        let overlaps = overlap_lengths(&spans);
        let chunks: Vec<String> = spans.into_iter().map(|span| span.content).collect();
        let total = chunks.len();
        log::debug!("split context into {total} chunks");

        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(EngineError::Cancelled);
        }

        let results = self
            .scheduler
            .run(chunks, strategy, self.handler.as_ref(), cancellation)?;

        let failures: Vec<_> = results.iter().filter(|result| !result.success).collect();
        if let Some(first) = failures.first() {
            if strategy.is_adaptive() {
                self.policy.record(chunk_size, false);
            }
            let failed_indices: Vec<usize> =
                failures.iter().map(|result| result.index()).collect();
            let first_error = first
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            log::warn!(
                "{} of {} chunks failed (chunks {:?}); discarding run",
                failed_indices.len(),
                total,
                failed_indices
            );
            return Err(EngineError::ChunkFailure {
                failed: failed_indices.len(),
                total,
                failed_indices,
                first_error,
            });
        }

        if strategy.is_adaptive() {
            self.policy.record(chunk_size, true);
        }

        let chunk_timings = results.iter().map(|result| result.processing_time).collect();
        let chunk_tokens = results
            .iter()
            .map(|result| result.metadata.token_count())
            .collect();
        let outputs = results.into_iter().map(|result| result.output).collect();
        let value = self.combiner.combine_overlapping(outputs, &overlaps)?;

        let duration = started.elapsed();
        log::info!(
            "processed {} chunks of {} tokens in {:.2?}",
            total,
            chunk_size,
            duration
        );

        Ok(ProcessingOutput {
            value,
            metadata: ProcessingMetadata {
                strategy,
                chunk_size,
                chunk_count: total,
                duration,
                chunk_timings,
                chunk_tokens,
            },
        })
    }

    fn select_chunk_size(&self, requested: usize, strategy: ChunkingStrategy) -> usize {
        match strategy {
            ChunkingStrategy::Adaptive => self.policy.suggest(requested),
            ChunkingStrategy::Fixed => requested,
        }
    }
}
