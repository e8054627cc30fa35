//! Phonetic lexicon for American English.
//!
//! Canonical IPA for common words, the table of words whose final *sound*
//! is a consonant even though the spelling ends in a vowel letter, and the
//! IPA renderings of function words used when orthographic alignment fails.

use std::collections::{HashMap, HashSet};

use crate::types::PRIMARY_STRESS;

lazy_static::lazy_static! {
    /// Canonical IPA for common words (clean form → IPA).
    static ref WORD_PHONETICS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // Pronouns
        for (w, ipa) in [
            ("i", "aɪ"), ("you", "ju"), ("he", "hi"), ("she", "ʃi"), ("it", "ɪt"),
            ("we", "wi"), ("they", "ðeɪ"), ("me", "mi"), ("him", "hɪm"), ("her", "hɚ"),
            ("us", "ʌs"), ("them", "ðəm"), ("my", "maɪ"), ("your", "jʊr"), ("his", "hɪz"),
            ("its", "ɪts"), ("our", "aʊr"), ("their", "ðɛr"),
        ] { m.insert(w, ipa); }
        // Articles & determiners
        for (w, ipa) in [
            ("a", "ə"), ("an", "ən"), ("the", "ðə"), ("this", "ðɪs"), ("that", "ðæt"),
            ("these", "ðiz"), ("those", "ðoʊz"),
        ] { m.insert(w, ipa); }
        // Auxiliaries
        for (w, ipa) in [
            ("is", "ɪz"), ("am", "æm"), ("are", "ɑr"), ("was", "wɑz"), ("were", "wɚ"),
            ("be", "bi"), ("been", "bɪn"), ("being", "ˈbiɪŋ"), ("have", "hæv"),
            ("has", "hæz"), ("had", "hæd"), ("having", "ˈhævɪŋ"), ("do", "du"),
            ("does", "dʌz"), ("did", "dɪd"),
        ] { m.insert(w, ipa); }
        // Modals
        for (w, ipa) in [
            ("can", "kæn"), ("could", "kʊd"), ("will", "wɪl"), ("would", "wʊd"),
            ("shall", "ʃæl"), ("should", "ʃʊd"), ("may", "meɪ"), ("might", "maɪt"),
            ("must", "mʌst"),
        ] { m.insert(w, ipa); }
        // Prepositions & conjunctions
        for (w, ipa) in [
            ("at", "æt"), ("in", "ɪn"), ("on", "ɑn"), ("to", "tu"), ("of", "ʌv"),
            ("for", "fɔr"), ("with", "wɪð"), ("from", "frɑm"), ("by", "baɪ"),
            ("about", "əˈbaʊt"), ("into", "ˈɪntu"), ("onto", "ˈɑntu"), ("up", "ʌp"),
            ("and", "ænd"), ("or", "ɔr"), ("but", "bʌt"), ("so", "soʊ"), ("if", "ɪf"),
            ("as", "æz"), ("than", "ðæn"),
        ] { m.insert(w, ipa); }
        // Wh-words
        for (w, ipa) in [
            ("how", "haʊ"), ("what", "wɑt"), ("when", "wɛn"), ("where", "wɛr"),
            ("why", "waɪ"), ("who", "hu"), ("whom", "hum"), ("whose", "huz"),
            ("which", "wɪtʃ"),
        ] { m.insert(w, ipa); }
        // Common content words
        for (w, ipa) in [
            ("afternoon", "ˌæftərˈnun"), ("pm", "ˌpiˈɛm"), ("three", "θri"),
            ("going", "ˈgoʊɪŋ"), ("go", "goʊ"), ("goes", "goʊz"), ("good", "gʊd"),
            ("morning", "ˈmɔrnɪŋ"), ("name", "neɪm"), ("time", "taɪm"), ("day", "deɪ"),
            ("like", "laɪk"), ("love", "lʌv"), ("give", "gɪv"), ("live", "lɪv"),
            ("pick", "pɪk"), ("turn", "tɝn"), ("look", "lʊk"), ("think", "θɪŋk"),
            ("tell", "tɛl"), ("ask", "æsk"), ("see", "si"), ("get", "gɛt"),
            ("make", "meɪk"), ("take", "teɪk"), ("come", "kʌm"), ("know", "noʊ"),
            ("want", "wɑnt"), ("need", "nid"), ("work", "wɝk"), ("home", "hoʊm"),
            ("fine", "faɪn"), ("great", "greɪt"), ("nice", "naɪs"), ("light", "laɪt"),
            ("all", "ɔl"), ("end", "ɛnd"), ("again", "əˈgɛn"), ("cat", "kæt"),
            ("dog", "dɔg"), ("big", "bɪg"), ("here", "hɪr"), ("there", "ðɛr"),
            ("please", "pliz"), ("thank", "θæŋk"), ("thanks", "θæŋks"), ("yes", "jɛs"),
            ("no", "noʊ"), ("not", "nɑt"), ("now", "naʊ"), ("out", "aʊt"),
            ("people", "ˈpipəl"), ("little", "ˈlɪtəl"), ("water", "ˈwɔtɚ"),
            ("coffee", "ˈkɑfi"), ("today", "təˈdeɪ"), ("tomorrow", "təˈmɑroʊ"),
        ] { m.insert(w, ipa); }
        m
    };

    /// Words spelled with a final vowel letter but ending in a consonant sound.
    static ref CONSONANT_ENDINGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // -ve → /v/
        for w in ["have", "gave", "give", "live", "love", "move", "prove", "save",
                  "serve", "drive", "arrive"] { m.insert(w, "v"); }
        // -the → /ð/
        for w in ["the", "breathe", "bathe"] { m.insert(w, "ð"); }
        // -se → /z/
        for w in ["use", "lose", "choose", "close", "please", "because", "whose",
                  "noise", "raise"] { m.insert(w, "z"); }
        // -re → /r/
        for w in ["are", "were", "where", "there", "here", "care", "share", "more",
                  "before", "store"] { m.insert(w, "r"); }
        // -ge → /dʒ/
        for w in ["age", "change", "large", "orange"] { m.insert(w, "dʒ"); }
        // Silent e after a consonant
        for (w, sound) in [
            ("like", "k"), ("make", "k"), ("take", "k"), ("wake", "k"), ("come", "m"),
            ("some", "m"), ("time", "m"), ("name", "m"), ("home", "m"), ("same", "m"),
            ("game", "m"), ("one", "n"), ("done", "n"), ("gone", "n"), ("fine", "n"),
            ("nice", "s"), ("since", "s"), ("once", "s"), ("late", "t"), ("write", "t"),
            ("made", "d"), ("side", "d"),
        ] { m.insert(w, sound); }
        // -le → /l/
        for w in ["able", "table", "people", "little", "simple", "possible"] { m.insert(w, "l"); }
        // Past tense
        for w in ["loved", "saved", "moved", "lived", "arrived", "used", "raised",
                  "closed", "changed", "cared", "shared", "stored", "served", "proved",
                  "breathed"] { m.insert(w, "d"); }
        // Third person singular
        for w in ["loves", "gives", "lives", "moves", "proves", "saves", "drives",
                  "arrives", "uses", "loses", "chooses", "closes", "raises", "serves"] {
            m.insert(w, "z");
        }
        m.insert("changes", "dʒ");
        m.insert("breathes", "ð");
        // Irregular
        for w in ["does", "goes", "says"] { m.insert(w, "z"); }
        m
    };

    /// IPA renderings of function words, strong and weak forms.
    static ref FUNCTION_WORD_IPA: HashSet<&'static str> = {
        [
            "ə", "ən", "ðə", "ði", "ðɪs", "ðæt", "ðət", "ðiz", "ðoʊz",
            "ɪz", "z", "æm", "əm", "ɑr", "ər", "ɚ", "wɑz", "wəz", "wɚ", "bi", "bɪn",
            "hæv", "həv", "əv", "hæz", "həz", "hæd", "həd", "du", "də", "dʌz", "dəz", "dɪd",
            "kæn", "kən", "kʊd", "kəd", "wɪl", "wʊd", "wəd", "ʃæl", "ʃʊd", "ʃəd",
            "meɪ", "maɪt", "mʌst", "məst",
            "æt", "ət", "ɪn", "ɑn", "tu", "tə", "ʌv", "fɔr", "fər", "fɚ", "wɪð", "frɑm",
            "frəm", "baɪ", "ʌp",
            "aɪ", "ju", "jə", "hi", "i", "ʃi", "ɪt", "wi", "ðeɪ", "mi", "hɪm", "ɪm",
            "hɚ", "ʌs", "əs", "ðəm", "əm", "maɪ", "jʊr", "jɚ", "hɪz", "ɪz", "ɪts",
            "aʊr", "ðɛr",
            "ænd", "ən", "n", "ɔr", "bʌt", "bət", "soʊ", "ɪf", "æz", "əz", "ðæn", "ðən",
        ].into_iter().collect()
    };
}

/// Canonical IPA for a clean word, or the word itself when unknown.
pub fn lookup_phonetic(clean: &str) -> String {
    WORD_PHONETICS
        .get(clean)
        .map(|ipa| ipa.to_string())
        .unwrap_or_else(|| clean.to_string())
}

/// Whether the lexicon has a canonical transcription for this word.
pub fn is_known(clean: &str) -> bool {
    WORD_PHONETICS.contains_key(clean)
}

/// IPA of the final consonant sound for vowel-spelled words in the override table.
pub fn final_consonant_sound(clean: &str) -> Option<&'static str> {
    CONSONANT_ENDINGS.get(clean).copied()
}

/// Whether a word ends in a consonant *sound*, spelling aside.
pub fn ends_in_consonant_sound(clean: &str) -> bool {
    if final_consonant_sound(clean).is_some() {
        return true;
    }
    clean
        .chars()
        .last()
        .map(|c| "bcdfghjklmnpqrstvwxyz".contains(c))
        .unwrap_or(false)
}

/// Whether an IPA fragment is a known function-word rendering.
pub fn is_function_word_phonetic(ipa: &str) -> bool {
    let bare = ipa.trim().trim_start_matches(PRIMARY_STRESS);
    !bare.is_empty() && FUNCTION_WORD_IPA.contains(bare)
}
