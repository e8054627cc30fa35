use serde::{Deserialize, Serialize};

/// Linking glyph used in the orthographic rendering ("have‿a").
pub const LINK_MARK: char = '‿';
/// Syllable-boundary mark used in the phonetic rendering ("hæv.ə").
pub const SYLLABLE_BOUNDARY: char = '.';
/// IPA primary stress.
pub const PRIMARY_STRESS: char = 'ˈ';
/// IPA secondary stress (U+02CC).
pub const SECONDARY_STRESS: char = 'ˌ';

/// Characters removed when deriving a word's clean form.
const CLEAN_PUNCT: &str = "?.!,;:'\"()[]{}";

/// Lowercase a word and drop punctuation so it can be used for lookups.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| !CLEAN_PUNCT.contains(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A whitespace-delimited token from the input sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    /// Token as written, trailing punctuation included
    pub text: String,
    /// Lowercase, punctuation stripped
    pub clean: String,
}

impl WordToken {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            clean: clean_word(text),
        }
    }
}

/// An input sentence split into word tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub words: Vec<WordToken>,
}

impl Sentence {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            words: text.split_whitespace().map(WordToken::new).collect(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lexical stress of a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stress {
    Stressed,
    Reduced,
}

impl Stress {
    pub fn glyph(self) -> char {
        match self {
            Stress::Stressed => '●',
            Stress::Reduced => '·',
        }
    }

    /// Parse the stress glyph carried by an intonation token, if any.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.contains('●') {
            Some(Stress::Stressed)
        } else if token.contains('·') {
            Some(Stress::Reduced)
        } else {
            None
        }
    }
}

/// Terminal pitch movement of a whole sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntonationDirection {
    Rising,
    Falling,
}

impl IntonationDirection {
    pub fn glyph(self) -> char {
        match self {
            IntonationDirection::Rising => '↗',
            IntonationDirection::Falling => '↘',
        }
    }

    pub fn is_direction_glyph(c: char) -> bool {
        c == '↗' || c == '↘'
    }
}

/// The three aligned renderings produced for a sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsodyAnnotation {
    /// Sentence with `‿` between linked words
    pub full_linked_sentence: String,
    /// One stress token per word, e.g. "· · ● ·↗"
    pub intonation_map: String,
    /// IPA with `.` at link positions
    pub full_linked_phonetic: String,
}

impl ProsodyAnnotation {
    pub fn intonation_tokens(&self) -> Vec<&str> {
        self.intonation_map.split_whitespace().collect()
    }
}

/// Annotation as returned by a remote model. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnnotation {
    pub full_linked_sentence: Option<String>,
    pub intonation_map: Option<String>,
    pub full_linked_phonetic: Option<String>,
}

impl From<ProsodyAnnotation> for RawAnnotation {
    fn from(a: ProsodyAnnotation) -> Self {
        Self {
            full_linked_sentence: Some(a.full_linked_sentence),
            intonation_map: Some(a.intonation_map),
            full_linked_phonetic: Some(a.full_linked_phonetic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Hello,"), "hello");
        assert_eq!(clean_word("What's"), "whats");
        assert_eq!(clean_word("(going?)"), "going");
        assert_eq!(clean_word("\"Yes!\""), "yes");
        assert_eq!(clean_word("well-known"), "well-known");
    }

    #[test]
    fn test_sentence_parse() {
        let s = Sentence::parse("  How is it   going? ");
        assert_eq!(s.word_count(), 4);
        assert_eq!(s.words[0].text, "How");
        assert_eq!(s.words[0].clean, "how");
        assert_eq!(s.words[3].text, "going?");
        assert_eq!(s.words[3].clean, "going");
    }

    #[test]
    fn test_sentence_empty() {
        let s = Sentence::parse("   ");
        assert!(s.is_empty());
        assert_eq!(s.word_count(), 0);
    }

    #[test]
    fn test_stress_from_token() {
        assert_eq!(Stress::from_token("●↘"), Some(Stress::Stressed));
        assert_eq!(Stress::from_token("·"), Some(Stress::Reduced));
        assert_eq!(Stress::from_token("↗"), None);
    }

    #[test]
    fn test_annotation_serde_uses_camel_case() {
        let a = ProsodyAnnotation {
            full_linked_sentence: "have‿a".into(),
            intonation_map: "· ·↘".into(),
            full_linked_phonetic: "hæv.ə".into(),
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["fullLinkedSentence"], "have‿a");
        assert_eq!(json["intonationMap"], "· ·↘");
        assert_eq!(json["fullLinkedPhonetic"], "hæv.ə");
    }

    #[test]
    fn test_raw_annotation_partial_fields() {
        let raw: RawAnnotation =
            serde_json::from_str(r#"{"intonationMap": "● ·↘", "extra": 1}"#).unwrap();
        assert_eq!(raw.intonation_map.as_deref(), Some("● ·↘"));
        assert!(raw.full_linked_sentence.is_none());
        assert!(raw.full_linked_phonetic.is_none());
    }
}
