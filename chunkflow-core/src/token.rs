//! Token count estimation
//!
//! Token counts are approximated from character length. Callers that need
//! exact counts can plug a real tokenizer in through [`TokenEstimator`].

use crate::CHARS_PER_TOKEN;

/// Estimates how many tokens a piece of text occupies
pub trait TokenEstimator: Send + Sync {
    /// Estimated token count of `text`
    fn estimate(&self, text: &str) -> usize;
}

/// Fixed characters-per-token heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRatioEstimator {
    chars_per_token: usize,
}

impl CharRatioEstimator {
    /// Create an estimator with the given ratio (values below 1 are treated as 1)
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    /// Characters counted as one token
    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(CHARS_PER_TOKEN)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count() / self.chars_per_token
    }
}

/// Estimate the token count of `text` as `char_len / 4`
pub fn estimate_token_count(text: &str) -> usize {
    CharRatioEstimator::default().estimate(text)
}
