//! Adaptive chunk-size policy
//!
//! Keeps success/failure counts per chunk size (in tokens) and suggests the
//! size for the next run: the clamped requested size by default, replaced by
//! the historically most reliable size once its success rate exceeds the
//! threshold. Ties in success rate go to the larger size.
//!
//! Sizes are stored exactly as used. The table only grows for the life of
//! the policy; its key space is bounded by the sizes callers actually use.

use crate::error::{CoreError, Result};
use crate::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE, SUCCESS_THRESHOLD};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Bounds and threshold for the adaptive policy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyConfig {
    /// Lower clamp for the default candidate (tokens)
    pub min_chunk_size: usize,
    /// Upper clamp for the default candidate (tokens)
    pub max_chunk_size: usize,
    /// Success rate a recorded size must exceed to override the default
    pub success_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: MIN_CHUNK_SIZE,
            max_chunk_size: MAX_CHUNK_SIZE,
            success_threshold: SUCCESS_THRESHOLD,
        }
    }
}

impl PolicyConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_chunk_size == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "min_chunk_size must be greater than 0".to_string(),
            });
        }

        if self.min_chunk_size > self.max_chunk_size {
            return Err(CoreError::InvalidConfig {
                reason: format!(
                    "min_chunk_size ({}) must not exceed max_chunk_size ({})",
                    self.min_chunk_size, self.max_chunk_size
                ),
            });
        }

        if !(0.0..1.0).contains(&self.success_threshold) {
            return Err(CoreError::InvalidConfig {
                reason: format!(
                    "success_threshold must be in [0, 1), got {}",
                    self.success_threshold
                ),
            });
        }

        Ok(())
    }
}

/// Snapshot of the statistics recorded for one chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeStats {
    /// Chunk size in tokens
    pub chunk_size: usize,
    /// Runs at this size that succeeded
    pub success_count: u64,
    /// Runs at this size that failed
    pub failure_count: u64,
}

impl SizeStats {
    /// Total recorded runs
    pub fn attempts(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// Share of successful runs (0.0 when nothing was recorded)
    pub fn success_rate(&self) -> f64 {
        let attempts = self.attempts();
        if attempts == 0 {
            return 0.0;
        }
        self.success_count as f64 / attempts as f64
    }
}

#[derive(Debug, Default)]
struct SizeCounters {
    successes: AtomicU64,
    failures: AtomicU64,
}

impl SizeCounters {
    fn bump(&self, success: bool) {
        let counter = if success {
            &self.successes
        } else {
            &self.failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, chunk_size: usize) -> SizeStats {
        SizeStats {
            chunk_size,
            success_count: self.successes.load(Ordering::Relaxed),
            failure_count: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Online size -> (successes, failures) table
///
/// Safe to share between concurrent orchestration runs: existing sizes are
/// updated with atomic increments under a read lock, and the write lock is
/// only taken to insert a size seen for the first time.
#[derive(Debug, Default)]
pub struct AdaptiveSizePolicy {
    config: PolicyConfig,
    stats: RwLock<HashMap<usize, SizeCounters>>,
}

impl AdaptiveSizePolicy {
    /// Create an empty policy with the given bounds
    pub fn new(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: RwLock::new(HashMap::new()),
        })
    }

    /// The policy bounds
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Suggest the chunk size for the next run
    pub fn suggest(&self, requested_size: usize) -> usize {
        let candidate =
            requested_size.clamp(self.config.min_chunk_size, self.config.max_chunk_size);

        match self.best_recorded() {
            Some(best) if best.success_rate() > self.config.success_threshold => {
                log::debug!(
                    "policy prefers {} tokens (success rate {:.2}) over {}",
                    best.chunk_size,
                    best.success_rate(),
                    candidate
                );
                best.chunk_size
            }
            _ => candidate,
        }
    }

    /// Record the outcome of a run at `size`
    pub fn record(&self, size: usize, success: bool) {
        {
            let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counters) = stats.get(&size) {
                counters.bump(success);
                return;
            }
        }

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.entry(size).or_default().bump(success);
    }

    /// Statistics for one size, if it was ever recorded
    pub fn stats_for(&self, size: usize) -> Option<SizeStats> {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        stats.get(&size).map(|counters| counters.snapshot(size))
    }

    /// All recorded statistics, ordered by chunk size
    pub fn snapshot(&self) -> Vec<SizeStats> {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<SizeStats> = stats
            .iter()
            .map(|(size, counters)| counters.snapshot(*size))
            .collect();
        entries.sort_by_key(|entry| entry.chunk_size);
        entries
    }

    /// Highest success rate among sizes with at least one success; larger size wins ties
    fn best_recorded(&self) -> Option<SizeStats> {
        self.snapshot()
            .into_iter()
            .filter(|entry| entry.success_count > 0)
            .max_by(|a, b| {
                a.success_rate()
                    .total_cmp(&b.success_rate())
                    .then(a.chunk_size.cmp(&b.chunk_size))
            })
    }
}
