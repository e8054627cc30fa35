//! Connected-speech linking between adjacent words.
//!
//! A pair links when the first word ends in a consonant sound and the
//! second starts with a vowel sound. Some function words drop their /h/
//! when they follow another word, so "tell him" links as "tell‿'im".

use std::collections::HashSet;

use crate::language::lexicon::ends_in_consonant_sound;
use crate::types::{clean_word, Sentence, LINK_MARK};

lazy_static::lazy_static! {
    /// Words whose initial /h/ is commonly dropped after another word.
    static ref H_DROPPING_WORDS: HashSet<&'static str> = {
        [
            // Pronouns
            "he", "him", "his", "her",
            // Auxiliaries
            "have", "has", "had", "having",
            // Other
            "here", "how",
        ].into_iter().collect()
    };
}

/// Whether a clean word starts with a vowel sound.
///
/// `contextual` is true when the word follows another word in the sentence,
/// which is the only position where h-dropping applies.
pub fn starts_with_vowel_sound(clean: &str, contextual: bool) -> bool {
    if contextual && H_DROPPING_WORDS.contains(clean) {
        return true;
    }
    clean
        .chars()
        .next()
        .map(|c| "aeiou".contains(c))
        .unwrap_or(false)
}

/// Whether two adjacent tokens link in connected speech.
pub fn should_link(current: &str, next: &str) -> bool {
    let current = clean_word(current);
    let next = clean_word(next);
    if current.is_empty() || next.is_empty() {
        return false;
    }
    ends_in_consonant_sound(&current) && starts_with_vowel_sound(&next, true)
}

/// Link decision for every adjacent pair (N words give N-1 decisions).
pub fn link_decisions(sentence: &Sentence) -> Vec<bool> {
    sentence
        .words
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0].clean, &pair[1].clean);
            !a.is_empty()
                && !b.is_empty()
                && ends_in_consonant_sound(a)
                && starts_with_vowel_sound(b, true)
        })
        .collect()
}

/// Join tokens with `sep_linked` where the decision is true, a space otherwise.
pub(crate) fn join_with_links<S: AsRef<str>>(
    parts: &[S],
    links: &[bool],
    sep_linked: char,
) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part.as_ref());
        if let Some(&linked) = links.get(i) {
            if i + 1 < parts.len() {
                out.push(if linked { sep_linked } else { ' ' });
            }
        }
    }
    out
}

/// Render the sentence with `‿` between linked words.
pub fn create_linked_sentence(text: &str) -> String {
    let sentence = Sentence::parse(text);
    let words: Vec<&str> = sentence.words.iter().map(|w| w.text.as_str()).collect();
    join_with_links(&words, &link_decisions(&sentence), LINK_MARK)
}

/// Display form of an h-dropping word ("him" → "'im"). Other tokens are returned as-is.
pub fn h_dropped_form(word: &str) -> String {
    let clean = clean_word(word);
    match clean.strip_prefix('h') {
        Some(rest) if H_DROPPING_WORDS.contains(clean.as_str()) => format!("'{}", rest),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_consonant_vowel_links() {
        assert!(should_link("pick", "it"));
        assert!(should_link("turn", "on"));
        assert!(should_link("look", "at"));
        assert!(should_link("think", "about"));
    }

    #[test]
    fn test_vowel_spelled_consonant_endings() {
        assert!(should_link("have", "a"));
        assert!(should_link("give", "it"));
        assert!(should_link("the", "end"));
        assert!(!should_link("are", "you"));
        assert!(should_link("are", "it"));
    }

    #[test]
    fn test_h_dropping() {
        assert!(should_link("tell", "him"));
        assert!(should_link("ask", "her"));
        assert!(should_link("they", "have"));
        assert!(!starts_with_vowel_sound("him", false));
        assert!(starts_with_vowel_sound("him", true));
    }

    #[test]
    fn test_no_linking() {
        assert!(!should_link("the", "cat"));
        assert!(!should_link("big", "dog"));
        assert!(!should_link("see", "you"));
    }

    #[test]
    fn test_empty_tokens_never_link() {
        assert!(!should_link("", "it"));
        assert!(!should_link("pick", ""));
        assert!(!should_link("pick", "?!"));
    }

    #[test]
    fn test_punctuation_is_ignored() {
        assert!(should_link("Pick,", "it!"));
        assert!(should_link("Tell", "Him."));
    }

    #[test]
    fn test_link_decisions_length() {
        let s = Sentence::parse("Pick it up and turn on the light.");
        let links = link_decisions(&s);
        assert_eq!(links.len(), s.word_count() - 1);
        assert_eq!(links, vec![true, true, true, false, true, false, false]);
        assert!(link_decisions(&Sentence::parse("Hi")).is_empty());
    }

    #[test]
    fn test_create_linked_sentence() {
        assert_eq!(
            create_linked_sentence("Pick it up and turn on the light."),
            "Pick‿it‿up‿and turn‿on the light."
        );
        assert_eq!(
            create_linked_sentence("I think about it all the time."),
            "I think‿about‿it‿all the time."
        );
        assert_eq!(
            create_linked_sentence("Great! I heard they have a nice playground there."),
            "Great!‿I heard they‿have‿a nice playground there."
        );
        assert_eq!(create_linked_sentence(""), "");
    }

    #[test]
    fn test_h_dropped_form() {
        assert_eq!(h_dropped_form("him"), "'im");
        assert_eq!(h_dropped_form("Have"), "'ave");
        assert_eq!(h_dropped_form("cat"), "cat");
        assert_eq!(h_dropped_form("house"), "house");
    }
}
