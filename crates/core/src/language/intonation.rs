//! Terminal intonation from a first-word question heuristic.
//!
//! Statements and wh-questions fall, yes/no questions rise. Only the
//! terminal `?` and the first word are inspected, so inverted or elliptical
//! questions can be misclassified.

use std::collections::HashSet;

use crate::language::stress::is_wh_word;
use crate::types::IntonationDirection;

lazy_static::lazy_static! {
    /// Auxiliaries that open a yes/no question, contracted negatives included.
    static ref YES_NO_OPENERS: HashSet<&'static str> = {
        [
            "do", "does", "did", "is", "are", "am", "was", "were",
            "can", "could", "will", "would", "shall", "should", "may", "might", "must",
            "have", "has", "had",
            "isn't", "aren't", "wasn't", "weren't", "can't", "couldn't", "won't",
            "wouldn't", "shouldn't", "haven't", "hasn't", "hadn't",
            "don't", "doesn't", "didn't",
        ].into_iter().collect()
    };
}

/// Closing characters allowed after the question mark (`"Really?"`).
const TRAILING_CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '”', '’'];

/// Whether the sentence ends in a question mark.
pub fn has_terminal_question_mark(text: &str) -> bool {
    let trimmed = text.trim_end().trim_end_matches(TRAILING_CLOSERS);
    trimmed.ends_with('?') || trimmed.ends_with('？')
}

/// Lowercased first word, apostrophes kept so contractions stay recognisable.
fn first_word_key(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let key: String = first
        .chars()
        .map(|c| if c == '’' { '\'' } else { c })
        .filter(|c| !"?.!,;:\"()[]{}¿".contains(*c))
        .flat_map(char::to_lowercase)
        .collect();
    let key = key.trim_matches('\'').to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// True when the sentence opens with a wh-word ("What's", "How").
pub fn is_wh_question(text: &str) -> bool {
    match first_word_key(text) {
        Some(key) => {
            let stem = key.split('\'').next().unwrap_or(&key);
            is_wh_word(&key) || is_wh_word(stem)
        }
        None => false,
    }
}

/// True when the sentence opens with a yes/no auxiliary.
pub fn is_yes_no_question(text: &str) -> bool {
    first_word_key(text)
        .map(|key| YES_NO_OPENERS.contains(key.as_str()))
        .unwrap_or(false)
}

/// Terminal pitch direction for a sentence. Rule order matters.
pub fn classify_intonation(text: &str) -> IntonationDirection {
    if !has_terminal_question_mark(text) {
        return IntonationDirection::Falling;
    }
    if is_wh_question(text) {
        return IntonationDirection::Falling;
    }
    if is_yes_no_question(text) {
        return IntonationDirection::Rising;
    }
    // Any other question is treated as yes/no
    IntonationDirection::Rising
}

#[cfg(test)]
mod tests {
    use super::*;
    use IntonationDirection::{Falling, Rising};

    #[test]
    fn test_statements_fall() {
        assert_eq!(classify_intonation("I'm fine."), Falling);
        assert_eq!(classify_intonation("Do it now."), Falling);
        assert_eq!(classify_intonation("what a day"), Falling);
    }

    #[test]
    fn test_yes_no_questions_rise() {
        assert_eq!(classify_intonation("Do you like it?"), Rising);
        assert_eq!(classify_intonation("Can you help me?"), Rising);
        assert_eq!(classify_intonation("Isn't it great?"), Rising);
        assert_eq!(classify_intonation("Don’t you think so?"), Rising);
    }

    #[test]
    fn test_wh_questions_fall() {
        assert_eq!(classify_intonation("What's your name?"), Falling);
        assert_eq!(classify_intonation("How is it going?"), Falling);
        assert_eq!(classify_intonation("Where are you going?"), Falling);
    }

    #[test]
    fn test_other_questions_default_to_rising() {
        assert_eq!(classify_intonation("You like it?"), Rising);
        assert_eq!(classify_intonation("\"Really?\""), Rising);
    }

    #[test]
    fn test_question_mark_must_be_terminal() {
        assert_eq!(classify_intonation("Do you? I don't."), Falling);
        assert!(has_terminal_question_mark("Ready？ "));
    }

    #[test]
    fn test_question_type_helpers() {
        assert!(is_wh_question("Who's there?"));
        assert!(!is_wh_question("Whoever said that?"));
        assert!(is_yes_no_question("Are you sure?"));
        assert!(!is_yes_no_question("You are sure?"));
        assert!(!is_yes_no_question(""));
    }
}
