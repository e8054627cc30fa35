//! Content/function word classification for sentence stress.

use std::collections::HashSet;

use crate::types::Stress;

lazy_static::lazy_static! {
    /// Words that are normally reduced in connected speech.
    static ref FUNCTION_WORDS: HashSet<&'static str> = {
        [
            // Articles, prepositions
            "a", "an", "the", "to", "of", "in", "on", "at", "by", "for", "with", "from",
            // Auxiliaries
            "is", "am", "are", "was", "were", "be", "been", "being",
            "do", "does", "did", "have", "has", "had",
            // Modals
            "can", "could", "will", "would", "shall", "should", "may", "might", "must",
            // Pronouns
            "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
            "my", "your", "his", "its", "our", "their",
            // Demonstratives
            "this", "that", "these", "those",
            // Conjunctions and others
            "and", "or", "but", "so", "if", "as", "than", "into", "onto", "up",
            // Wh-words
            "what", "when", "where", "which", "who", "whom", "whose", "why", "how",
        ].into_iter().collect()
    };

    static ref WH_WORDS: HashSet<&'static str> = {
        ["what", "when", "where", "which", "who", "whom", "whose", "why", "how"]
            .into_iter()
            .collect()
    };
}

/// Whether a clean word belongs to the function-word table.
///
/// Wh-words are in the table but still receive stress, see [`classify_stress`].
pub fn is_function_word(clean: &str) -> bool {
    FUNCTION_WORDS.contains(clean)
}

pub fn is_wh_word(clean: &str) -> bool {
    WH_WORDS.contains(clean)
}

/// Stress for a clean word: wh-words and content words are stressed.
pub fn classify_stress(clean: &str) -> Stress {
    if is_wh_word(clean) || !is_function_word(clean) {
        Stress::Stressed
    } else {
        Stress::Reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_words() {
        for w in ["a", "the", "is", "could", "them", "those", "and", "up"] {
            assert!(is_function_word(w), "{} should be a function word", w);
        }
        assert!(!is_function_word("going"));
        assert!(!is_function_word("name"));
    }

    #[test]
    fn test_wh_words_are_stressed() {
        for w in ["what", "how", "why", "whose"] {
            assert!(is_wh_word(w));
            assert!(is_function_word(w));
            assert_eq!(classify_stress(w), Stress::Stressed);
        }
    }

    #[test]
    fn test_classify_stress() {
        assert_eq!(classify_stress("the"), Stress::Reduced);
        assert_eq!(classify_stress("you"), Stress::Reduced);
        assert_eq!(classify_stress("like"), Stress::Stressed);
        assert_eq!(classify_stress("playground"), Stress::Stressed);
    }
}
