//! Caller-supplied chunk and combine functions
//!
//! Both traits are implemented for plain closures, so most callers never
//! name them directly.

/// Error type returned by caller-supplied functions
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Work applied independently to every chunk (for example a remote model call)
pub trait ChunkHandler: Send + Sync {
    /// Process one chunk of text
    fn process_chunk(&self, chunk: &str) -> Result<String, BoxError>;
}

impl<F> ChunkHandler for F
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync,
{
    fn process_chunk(&self, chunk: &str) -> Result<String, BoxError> {
        self(chunk)
    }
}

/// Reduction of the ordered chunk outputs into the final value
pub trait ResultCombiner<T>: Send + Sync {
    /// Combine outputs given in document order
    fn combine(&self, outputs: Vec<String>) -> Result<T, BoxError>;

    /// Combine outputs knowing how much source text neighbouring chunks share
    ///
    /// `overlaps[i]` is the number of characters chunk `i + 1` repeats from
    /// the end of chunk `i`. Most reductions ignore it.
    fn combine_overlapping(
        &self,
        outputs: Vec<String>,
        overlaps: &[usize],
    ) -> Result<T, BoxError> {
        let _ = overlaps;
        self.combine(outputs)
    }
}

impl<T, F> ResultCombiner<T> for F
where
    F: Fn(Vec<String>) -> Result<T, BoxError> + Send + Sync,
{
    fn combine(&self, outputs: Vec<String>) -> Result<T, BoxError> {
        self(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_implement_traits() {
        let handler = |chunk: &str| -> Result<String, BoxError> { Ok(chunk.len().to_string()) };
        let combiner =
            |outputs: Vec<String>| -> Result<usize, BoxError> { Ok(outputs.len()) };

        assert_eq!(handler.process_chunk("abc").unwrap(), "3");
        assert_eq!(
            combiner
                .combine(vec!["a".to_string(), "b".to_string()])
                .unwrap(),
            2
        );
        assert_eq!(
            combiner
                .combine_overlapping(vec!["a".to_string(), "b".to_string()], &[1])
                .unwrap(),
            2
        );
    }
}
