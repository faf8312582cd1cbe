//! Overlap-aware text splitting
//!
//! The splitter walks the text left to right in windows of
//! `target_tokens * chars_per_token` characters. A window that does not reach
//! the end of the text is cut back to the last `". "` or `'\n'` it contains,
//! provided that breakpoint lies in the second half of the window. Each chunk
//! then hands the last 25% of its token budget to the next chunk as overlap,
//! so cross-boundary context reaches the downstream processor.
//!
//! All positions are character offsets; multi-byte text is never cut inside
//! a UTF-8 sequence.

use crate::error::{CoreError, Result};
use crate::CHARS_PER_TOKEN;

/// Share of the token budget carried into the next chunk (1/4)
const OVERLAP_DIVISOR: usize = 4;

/// Splitter tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Characters counted as one token when turning a token budget into characters
    pub chars_per_token: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chars_per_token: CHARS_PER_TOKEN,
        }
    }
}

impl SplitterConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chars_per_token == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "chars_per_token must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// A chunk together with the window it was cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Trimmed chunk text
    pub content: String,
    /// Character offset where the (untrimmed) window starts
    pub start: usize,
    /// Character offset one past the end of the (untrimmed) window
    pub end: usize,
    /// Character offset where the trimmed content starts
    pub content_start: usize,
}

impl TextChunk {
    /// Number of characters covered by the window
    pub fn span_len(&self) -> usize {
        self.end - self.start
    }

    /// Character offset one past the end of the trimmed content
    pub fn content_end(&self) -> usize {
        self.content_start + self.content.chars().count()
    }

    /// Characters of `next`'s content that repeat the end of this chunk's content
    pub fn overlap_with(&self, next: &TextChunk) -> usize {
        self.content_end()
            .min(next.content_end())
            .saturating_sub(next.content_start)
    }
}

/// Overlap between each pair of neighbouring chunks, in characters
///
/// Entry `i` is the number of leading characters of chunk `i + 1` that repeat
/// the end of chunk `i`.
pub fn overlap_lengths(chunks: &[TextChunk]) -> Vec<usize> {
    chunks
        .windows(2)
        .map(|pair| pair[0].overlap_with(&pair[1]))
        .collect()
}

/// Splits text into overlapping chunks of roughly equal token size
#[derive(Debug, Clone, Copy, Default)]
pub struct Splitter {
    config: SplitterConfig,
}

impl Splitter {
    /// Create a splitter with the given configuration
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Character budget for one chunk of `target_tokens` tokens
    pub fn char_budget(&self, target_tokens: usize) -> usize {
        target_tokens.max(1).saturating_mul(self.config.chars_per_token)
    }

    /// Characters carried from the end of one chunk into the next
    pub fn overlap_chars(&self, target_tokens: usize) -> usize {
        (target_tokens.max(1) / OVERLAP_DIVISOR).saturating_mul(self.config.chars_per_token)
    }

    /// Split `text` into trimmed chunks of about `target_tokens` tokens
    ///
    /// Returns an empty list for empty or whitespace-only input.
    pub fn split(&self, text: &str, target_tokens: usize) -> Vec<String> {
        self.split_with_spans(text, target_tokens)
            .into_iter()
            .map(|chunk| chunk.content)
            .collect()
    }

    /// Split `text` and keep the character window of every chunk
    pub fn split_with_spans(&self, text: &str, target_tokens: usize) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let budget = self.char_budget(target_tokens);
        let overlap = self.overlap_chars(target_tokens);

        let mut chunks = Vec::with_capacity(len / budget + 1);
        let mut position = 0;

        while position < len {
            let window_end = position.saturating_add(budget).min(len);
            let mut chunk_len = window_end - position;

            if window_end < len {
                if let Some(breakpoint) = find_breakpoint(&chars[position..window_end]) {
                    if breakpoint > chunk_len / 2 {
                        chunk_len = breakpoint + 1;
                    }
                }
            }

            let end = position + chunk_len;
            let window: String = chars[position..end].iter().collect();
            let content = window.trim();
            if !content.is_empty() {
                let leading = window.chars().take_while(|c| c.is_whitespace()).count();
                chunks.push(TextChunk {
                    content: content.to_string(),
                    start: position,
                    end,
                    content_start: position + leading,
                });
            }

            if end >= len {
                break;
            }

            // Degenerate windows (shorter than the overlap) jump to the end
            let next = end.saturating_sub(overlap);
            position = if next > position { next } else { len };
        }

        chunks
    }
}

/// Split `text` with the default 4-characters-per-token budget
pub fn split(text: &str, target_tokens: usize) -> Vec<String> {
    Splitter::default().split(text, target_tokens)
}

/// Index of the last `'\n'` or the `'.'` of the last `". "` in the window
fn find_breakpoint(window: &[char]) -> Option<usize> {
    (0..window.len()).rev().find(|&i| {
        window[i] == '\n' || (window[i] == '.' && window.get(i + 1) == Some(&' '))
    })
}
