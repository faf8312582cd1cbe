//! Property tests for the splitter

use chunkflow_core::{overlap_lengths, split, Splitter};
use proptest::prelude::*;

proptest! {
    #[test]
    fn chunks_cover_every_non_whitespace_char(
        text in "[a-zA-Z0-9 .\n]{1,1500}",
        tokens in 1usize..300,
    ) {
        let chars: Vec<char> = text.chars().collect();
        let chunks = Splitter::default().split_with_spans(&text, tokens);

        let mut covered = vec![false; chars.len()];
        for chunk in &chunks {
            for slot in &mut covered[chunk.start..chunk.end] {
                *slot = true;
            }
        }

        for (i, ch) in chars.iter().enumerate() {
            if !ch.is_whitespace() {
                prop_assert!(covered[i], "char {} ({:?}) not covered", i, ch);
            }
        }
    }

    #[test]
    fn chunks_respect_budget_and_order(
        text in "[a-z .\n]{1,1500}",
        tokens in 1usize..300,
    ) {
        let splitter = Splitter::default();
        let budget = splitter.char_budget(tokens);
        let chunks = splitter.split_with_spans(&text, tokens);
        let chars: Vec<char> = text.chars().collect();

        for chunk in &chunks {
            prop_assert!(chunk.span_len() <= budget);
            let window: String = chars[chunk.start..chunk.end].iter().collect();
            prop_assert_eq!(window.trim(), chunk.content.as_str());
            prop_assert!(!chunk.content.is_empty());
        }

        for pair in chunks.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn reported_overlap_is_shared_text(
        text in "[a-c .\n]{1,1500}",
        tokens in 1usize..300,
    ) {
        let chunks = Splitter::default().split_with_spans(&text, tokens);
        let overlaps = overlap_lengths(&chunks);
        prop_assert_eq!(overlaps.len(), chunks.len().saturating_sub(1));

        for (pair, &overlap) in chunks.windows(2).zip(&overlaps) {
            let next: Vec<char> = pair[1].content.chars().collect();
            prop_assert!(overlap <= next.len());
            let shared: String = next[..overlap].iter().collect();
            prop_assert!(pair[0].content.ends_with(&shared));
        }
    }

    #[test]
    fn whitespace_only_input_yields_nothing(text in "[ \t\n]{0,200}", tokens in 1usize..600) {
        prop_assert!(split(&text, tokens).is_empty());
    }
}

#[test]
fn test_short_text_is_one_trimmed_chunk() {
    let text = "\n  A single paragraph that fits easily.  \n";
    let chunks = split(text, 512);
    assert_eq!(chunks, vec![text.trim().to_string()]);
}

#[test]
fn test_repeated_sentences_break_after_periods() {
    let text = (0..64)
        .map(|i| format!("Sentence number {i:03} ends here."))
        .collect::<Vec<_>>()
        .join(" ");

    let chunks = split(&text, 100);
    assert_eq!(chunks.len(), 7);
    for chunk in &chunks {
        assert!(chunk.ends_with('.'), "chunk should end on a sentence: {chunk}");
    }
}
