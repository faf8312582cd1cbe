//! Bounded-parallel chunk execution
//!
//! The scheduler owns a dedicated rayon pool of `min(cpus, max_parallelism)`
//! workers. Every chunk runs independently: an error or a panic in the chunk
//! function becomes a failed [`ChunkResult`] and never stops sibling chunks.
//! Results are returned sorted by chunk index, whatever order they finished in.

use crate::{
    cancel::CancellationToken,
    error::{EngineError, Result},
    handler::ChunkHandler,
};
use chunkflow_core::{
    CharRatioEstimator, ChunkMetadata, ChunkResult, ChunkingStrategy, TokenEstimator,
};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Runs the chunk function over all chunks of one split
pub struct ChunkScheduler {
    /// Thread pool for parallel execution
    thread_pool: Arc<rayon::ThreadPool>,

    /// Token estimator for chunk metadata
    estimator: Arc<dyn TokenEstimator>,
}

impl std::fmt::Debug for ChunkScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkScheduler")
            .field("threads", &self.thread_count())
            .finish()
    }
}

impl ChunkScheduler {
    /// Create a scheduler with `threads` workers
    pub fn new(threads: usize) -> Result<Self> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("chunkflow-worker-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(Self {
            thread_pool: Arc::new(thread_pool),
            estimator: Arc::new(CharRatioEstimator::default()),
        })
    }

    /// Replace the token estimator used for chunk metadata
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Returns the number of threads in the pool
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Process every chunk and return the results in document order
    ///
    /// Once `cancellation` fires, chunks that have not started are skipped and
    /// the whole run reports [`EngineError::Cancelled`].
    pub fn run(
        &self,
        chunks: Vec<String>,
        strategy: ChunkingStrategy,
        handler: &dyn ChunkHandler,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Vec<ChunkResult<String>>> {
        let total = chunks.len();
        let is_cancelled = || cancellation.is_some_and(CancellationToken::is_cancelled);

        let outcomes: Vec<Option<ChunkResult<String>>> = self.thread_pool.install(|| {
            chunks
                .into_par_iter()
                .enumerate()
                .map(|(index, chunk)| {
                    if is_cancelled() {
                        return None;
                    }
                    Some(self.run_one(index, total, &chunk, strategy, handler))
                })
                .collect()
        });

        if is_cancelled() {
            log::debug!("chunk run cancelled");
            return Err(EngineError::Cancelled);
        }

        let mut results: Vec<ChunkResult<String>> = outcomes.into_iter().flatten().collect();
        results.sort_by_key(ChunkResult::index);
        Ok(results)
    }

    fn run_one(
        &self,
        index: usize,
        total: usize,
        chunk: &str,
        strategy: ChunkingStrategy,
        handler: &dyn ChunkHandler,
    ) -> ChunkResult<String> {
        let metadata = ChunkMetadata::new(index, total, self.estimator.estimate(chunk), strategy);

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.process_chunk(chunk)));
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(output)) => ChunkResult::succeeded(output, metadata, elapsed),
            Ok(Err(err)) => {
                log::warn!("chunk {}/{} failed: {}", index + 1, total, err);
                ChunkResult::failed(metadata, elapsed, err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::warn!("chunk {}/{} panicked: {}", index + 1, total, message);
                ChunkResult::failed(metadata, elapsed, format!("panicked: {message}"))
            }
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn chunks(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("chunk-{i}")).collect()
    }

    #[test]
    fn test_results_sorted_despite_completion_order() {
        let scheduler = ChunkScheduler::new(4).unwrap();
        // Early chunks sleep longest, so they finish last
        let handler = |chunk: &str| -> std::result::Result<String, BoxError> {
            let index: u64 = chunk.trim_start_matches("chunk-").parse()?;
            std::thread::sleep(Duration::from_millis((8 - index) * 5));
            Ok(chunk.to_uppercase())
        };

        let results = scheduler
            .run(chunks(8), ChunkingStrategy::Fixed, &handler, None)
            .unwrap();

        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.index(), i);
            assert_eq!(result.metadata.total_chunks(), 8);
            assert_eq!(result.output, format!("CHUNK-{i}"));
            assert!(result.success);
        }
    }

    #[test]
    fn test_failure_and_panic_are_isolated() {
        let scheduler = ChunkScheduler::new(2).unwrap();
        let attempts = AtomicUsize::new(0);
        let handler = |chunk: &str| -> std::result::Result<String, BoxError> {
            attempts.fetch_add(1, Ordering::SeqCst);
            match chunk {
                "chunk-1" => Err("service unavailable".into()),
                "chunk-3" => panic!("handler bug"),
                _ => Ok(chunk.to_string()),
            }
        };

        let results = scheduler
            .run(chunks(5), ChunkingStrategy::Adaptive, &handler, None)
            .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 5);
        let failed: Vec<usize> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.index())
            .collect();
        assert_eq!(failed, vec![1, 3]);
        assert_eq!(results[1].error.as_deref(), Some("service unavailable"));
        assert!(results[3].error.as_deref().unwrap().contains("handler bug"));
        assert!(results[3].output.is_empty());
    }

    #[test]
    fn test_cancelled_before_start_skips_all_chunks() {
        let scheduler = ChunkScheduler::new(2).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let attempts = AtomicUsize::new(0);
        let handler = |chunk: &str| -> std::result::Result<String, BoxError> {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok(chunk.to_string())
        };

        let err = scheduler
            .run(chunks(6), ChunkingStrategy::Fixed, &handler, Some(&token))
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_mid_run_stops_new_chunks() {
        let scheduler = ChunkScheduler::new(1).unwrap();
        let token = CancellationToken::new();
        let attempts = AtomicUsize::new(0);
        let handler = |chunk: &str| -> std::result::Result<String, BoxError> {
            if attempts.fetch_add(1, Ordering::SeqCst) == 1 {
                token.cancel();
            }
            Ok(chunk.to_string())
        };

        let err = scheduler
            .run(chunks(20), ChunkingStrategy::Fixed, &handler, Some(&token))
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(attempts.load(Ordering::SeqCst) < 20);
    }

    #[test]
    fn test_metadata_uses_estimator() {
        struct WordEstimator;
        impl TokenEstimator for WordEstimator {
            fn estimate(&self, text: &str) -> usize {
                text.split_whitespace().count()
            }
        }

        let scheduler = ChunkScheduler::new(1)
            .unwrap()
            .with_estimator(Arc::new(WordEstimator));
        let handler =
            |chunk: &str| -> std::result::Result<String, BoxError> { Ok(chunk.to_string()) };

        let results = scheduler
            .run(
                vec!["one two three".to_string()],
                ChunkingStrategy::Fixed,
                &handler,
                None,
            )
            .unwrap();

        assert_eq!(results[0].metadata.token_count(), 3);
    }

    #[test]
    fn test_thread_count() {
        let scheduler = ChunkScheduler::new(3).unwrap();
        assert_eq!(scheduler.thread_count(), 3);
        assert_eq!(ChunkScheduler::new(0).unwrap().thread_count(), 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
