use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle the words of a passage into a fresh target text.
///
/// Words are split on any whitespace and rejoined with single spaces, so
/// runs of whitespace in the source collapse. The permutation is uniform
/// (Fisher-Yates via `SliceRandom::shuffle`) and freshly seeded per call.
pub fn scramble(passage: &str) -> String {
    let mut words: Vec<&str> = passage.split_whitespace().collect();
    words.shuffle(&mut thread_rng());
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn word_multiset(text: &str) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for word in text.split_whitespace() {
            *counts.entry(word).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn preserves_word_multiset() {
        let passage = "the quick brown fox jumps over the lazy dog";
        let scrambled = scramble(passage);
        assert_eq!(word_multiset(passage), word_multiset(&scrambled));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(scramble(""), "");
        assert_eq!(scramble("   \t \n "), "");
    }

    #[test]
    fn single_word_is_unchanged() {
        assert_eq!(scramble("hello"), "hello");
    }

    #[test]
    fn normalizes_whitespace_runs() {
        let scrambled = scramble("a  b\tc\n\nd");
        assert_eq!(scrambled.split(' ').count(), 4);
        assert!(!scrambled.contains("  "));
        assert!(!scrambled.contains('\t'));
        assert!(!scrambled.contains('\n'));
    }

    #[test]
    fn length_differs_only_by_whitespace_normalization() {
        let passage = "one   two three    four";
        let scrambled = scramble(passage);
        assert_eq!(scrambled.len(), "one two three four".len());
    }

    #[test]
    fn consecutive_calls_vary() {
        // 20 distinct words have 20! orderings; ten draws landing on a
        // single ordering means the shuffle is broken, not unlucky.
        let passage = (b'a'..=b't')
            .map(|c| (c as char).to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let first = scramble(&passage);
        let varied = (0..10).any(|_| scramble(&passage) != first);
        assert!(varied);
    }
}
