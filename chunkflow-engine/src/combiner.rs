//! Reduction of ordered chunk outputs
//!
//! [`Combiner`] wraps the caller-supplied reduction and turns its errors and
//! panics into [`EngineError::CombineFailure`]. Two ready-made reductions are
//! provided: plain joining, and joining that drops the text each chunk
//! repeats from the end of its predecessor.

use crate::{
    error::{EngineError, Result},
    handler::{BoxError, ResultCombiner},
    scheduler::panic_message,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Invokes the reduction over successful outputs in document order
pub struct Combiner<T> {
    inner: Arc<dyn ResultCombiner<T>>,
}

impl<T> Clone for Combiner<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Combiner<T> {
    /// Wrap a reduction
    pub fn new(inner: Arc<dyn ResultCombiner<T>>) -> Self {
        Self { inner }
    }

    /// Combine outputs; failures never escape as panics
    pub fn combine(&self, outputs: Vec<String>) -> Result<T> {
        self.guarded(outputs.len(), || self.inner.combine(outputs))
    }

    /// Combine outputs together with the overlap between neighbouring chunks
    pub fn combine_overlapping(&self, outputs: Vec<String>, overlaps: &[usize]) -> Result<T> {
        self.guarded(outputs.len(), || {
            self.inner.combine_overlapping(outputs, overlaps)
        })
    }

    fn guarded<F>(&self, count: usize, reduce: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, BoxError>,
    {
        match panic::catch_unwind(AssertUnwindSafe(reduce)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                log::warn!("combining {} outputs failed: {}", count, err);
                Err(EngineError::CombineFailure {
                    reason: err.to_string(),
                })
            }
            Err(payload) => Err(EngineError::CombineFailure {
                reason: format!("panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }
}

/// Concatenates outputs with a separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCombiner {
    separator: String,
}

impl JoinCombiner {
    /// Create a combiner that joins with `separator`
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for JoinCombiner {
    fn default() -> Self {
        Self::new("\n")
    }
}

impl ResultCombiner<String> for JoinCombiner {
    fn combine(&self, outputs: Vec<String>) -> std::result::Result<String, BoxError> {
        Ok(outputs.join(&self.separator))
    }
}

/// Joins outputs, dropping the text each output repeats from its predecessor
///
/// When the processor reports the real overlap between neighbouring chunks,
/// exactly that many leading characters are dropped, provided the merged text
/// really ends with them. Otherwise (the chunk function rewrote its input, or
/// the outputs came from elsewhere) the merger falls back to the longest
/// prefix that repeats the end of the merged text. The fallback is bounded by
/// `max_overlap_chars` and by the reported overlap, and never swallows a
/// whole output.
///
/// Chunks are trimmed, so whitespace between chunks that did not overlap is
/// not restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapMergeCombiner {
    max_overlap_chars: usize,
}

impl OverlapMergeCombiner {
    /// Create a merger that looks back at most `max_overlap_chars` characters
    pub fn new(max_overlap_chars: usize) -> Self {
        Self { max_overlap_chars }
    }

    /// Append `next` to `merged`, skipping the overlapping prefix
    fn append(&self, merged: &mut String, next: &str, known_overlap: Option<usize>) {
        if let Some(chars) = known_overlap {
            let end = byte_offset(next, chars);
            if merged.ends_with(&next[..end]) {
                merged.push_str(&next[end..]);
                return;
            }
        }

        let limit = known_overlap.map_or(self.max_overlap_chars, |chars| {
            chars.min(self.max_overlap_chars)
        });

        // Byte offsets ending the 1-char, 2-char, ... proper prefixes of `next`
        let prefix_ends: Vec<usize> = next
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .take(limit)
            .filter(|&end| end <= merged.len())
            .collect();

        let overlap = prefix_ends
            .into_iter()
            .rev()
            .find(|&end| merged.ends_with(&next[..end]))
            .unwrap_or(0);

        merged.push_str(&next[overlap..]);
    }

    fn merge(&self, outputs: Vec<String>, overlaps: &[usize]) -> String {
        let mut merged = String::new();
        for (i, output) in outputs.iter().enumerate() {
            if i == 0 {
                merged.push_str(output);
                continue;
            }
            self.append(&mut merged, output, overlaps.get(i - 1).copied());
        }
        merged
    }
}

/// Byte offset just past the first `chars` characters of `text`
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

impl ResultCombiner<String> for OverlapMergeCombiner {
    fn combine(&self, outputs: Vec<String>) -> std::result::Result<String, BoxError> {
        Ok(self.merge(outputs, &[]))
    }

    fn combine_overlapping(
        &self,
        outputs: Vec<String>,
        overlaps: &[usize],
    ) -> std::result::Result<String, BoxError> {
        Ok(self.merge(outputs, overlaps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_combiner() {
        let combiner = Combiner::new(Arc::new(JoinCombiner::new("|")));
        assert_eq!(combiner.combine(owned(&["a", "b", "c"])).unwrap(), "a|b|c");
        assert_eq!(combiner.combine(Vec::new()).unwrap(), "");
    }

    #[test]
    fn test_combine_error_is_wrapped() {
        let failing = |_: Vec<String>| -> std::result::Result<String, BoxError> {
            Err("quota exceeded".into())
        };
        let combiner: Combiner<String> = Combiner::new(Arc::new(failing));

        match combiner.combine(owned(&["x"])) {
            Err(EngineError::CombineFailure { reason }) => assert_eq!(reason, "quota exceeded"),
            other => panic!("expected CombineFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_combine_panic_is_wrapped() {
        let panicking = |_: Vec<String>| -> std::result::Result<usize, BoxError> {
            panic!("reducer bug");
        };
        let combiner: Combiner<usize> = Combiner::new(Arc::new(panicking));

        let err = combiner.combine(owned(&["x"])).unwrap_err();
        assert!(err.to_string().contains("reducer bug"));
    }

    #[test]
    fn test_overlap_merge_drops_repeated_prefix() {
        let merger = OverlapMergeCombiner::new(100);
        let merged = merger
            .combine(owned(&["The quick brown", "brown fox jumps", "jumps over"]))
            .unwrap();
        assert_eq!(merged, "The quick brown fox jumps over");
    }

    #[test]
    fn test_overlap_merge_respects_limit_and_chars() {
        let merger = OverlapMergeCombiner::new(3);
        let merged = merger.combine(owned(&["abcdef", "cdefgh"])).unwrap();
        // overlap of 4 chars exceeds the limit, nothing is dropped
        assert_eq!(merged, "abcdefcdefgh");

        let merger = OverlapMergeCombiner::new(64);
        let merged = merger.combine(owned(&["日本語の文章", "文章です"])).unwrap();
        assert_eq!(merged, "日本語の文章です");
    }

    #[test]
    fn test_overlap_merge_uses_reported_overlap() {
        let merger = OverlapMergeCombiner::new(100);
        // Periodic text: the longest repeated prefix (10 chars) is not the real overlap (5)
        let merged = merger
            .combine_overlapping(owned(&["ab ab ab ab", "ab ab ab ab ab"]), &[5])
            .unwrap();
        assert_eq!(merged, "ab ab ab ab ab ab ab");
    }

    #[test]
    fn test_overlap_merge_falls_back_when_text_changed() {
        let merger = OverlapMergeCombiner::new(100);
        let merged = merger
            .combine_overlapping(owned(&["Hello world", "WORLD again"]), &[5])
            .unwrap();
        assert_eq!(merged, "Hello worldWORLD again");
    }

    #[test]
    fn test_overlap_merge_never_swallows_whole_output() {
        let merger = OverlapMergeCombiner::new(100);
        let merged = merger.combine(owned(&["abcabc", "abc"])).unwrap();
        assert_eq!(merged, "abcabcabc");
    }

    #[test]
    fn test_combiner_passes_overlaps_through() {
        let combiner: Combiner<String> = Combiner::new(Arc::new(OverlapMergeCombiner::new(8)));
        let merged = combiner
            .combine_overlapping(owned(&["one two", "two three"]), &[3])
            .unwrap();
        assert_eq!(merged, "one two three");
    }
}
