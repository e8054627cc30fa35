//! Builds and validates prosody annotations.
//!
//! An externally supplied annotation is accepted only when its intonation
//! map has one token per word and its linked sentence and phonetic are
//! present. Anything else is replaced by a locally synthesized annotation,
//! so callers always receive a structurally valid result.

use thiserror::Error;

use crate::language::intonation::classify_intonation;
use crate::language::lexicon::{is_known, lookup_phonetic};
use crate::language::linking::{join_with_links, link_decisions};
use crate::language::stress::classify_stress;
use crate::prosody::repair::{normalize_linked_sentence, repair_aligned};
use crate::prosody::response::parse_model_response;
use crate::types::{
    IntonationDirection, ProsodyAnnotation, RawAnnotation, Sentence, Stress, LINK_MARK,
    SYLLABLE_BOUNDARY,
};

/// Minimum ratio of phonetic segments to words for a transcription to count as complete.
const MIN_PHONETIC_COVERAGE: f64 = 0.6;

/// Why an external annotation was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnnotationShapeError {
    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),

    #[error("intonation map has {found} tokens, expected {expected}")]
    TokenCount { expected: usize, found: usize },
}

fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, AnnotationShapeError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AnnotationShapeError::MissingField(name))
}

/// Checked (linked sentence, intonation map, phonetic) of a raw annotation.
fn checked_fields<'a>(
    raw: &'a RawAnnotation,
    sentence: &Sentence,
) -> Result<(&'a str, &'a str, &'a str), AnnotationShapeError> {
    let map = required(&raw.intonation_map, "intonationMap")?;
    let found = map.split_whitespace().count();
    if found != sentence.word_count() {
        return Err(AnnotationShapeError::TokenCount {
            expected: sentence.word_count(),
            found,
        });
    }
    let linked = required(&raw.full_linked_sentence, "fullLinkedSentence")?;
    let phonetic = required(&raw.full_linked_phonetic, "fullLinkedPhonetic")?;
    Ok((linked, map, phonetic))
}

/// Check the shape of an external annotation against the sentence.
pub fn validate(raw: &RawAnnotation, sentence: &Sentence) -> Result<(), AnnotationShapeError> {
    checked_fields(raw, sentence).map(|_| ())
}

pub fn is_valid(raw: &RawAnnotation, sentence: &Sentence) -> bool {
    validate(raw, sentence).is_ok()
}

/// One stress token per word; the last also carries the sentence direction.
pub fn intonation_tokens(sentence: &Sentence) -> Vec<String> {
    let direction = classify_intonation(&sentence.text);
    let last = sentence.word_count().saturating_sub(1);
    sentence
        .words
        .iter()
        .enumerate()
        .map(|(i, word)| stress_token(classify_stress(&word.clean), i == last, direction))
        .collect()
}

/// Space-separated intonation tokens, e.g. "· · ● ·↗".
pub fn generate_intonation_map(sentence: &Sentence) -> String {
    intonation_tokens(sentence).join(" ")
}

fn stress_token(stress: Stress, is_last: bool, direction: IntonationDirection) -> String {
    let mut token = stress.glyph().to_string();
    if is_last {
        token.push(direction.glyph());
    }
    token
}

/// Keep each token's stress glyph and put the direction glyph on the last one only.
fn normalize_intonation_map(map: &str, sentence: &Sentence) -> String {
    let direction = classify_intonation(&sentence.text);
    let last = sentence.word_count().saturating_sub(1);
    map.split_whitespace()
        .zip(&sentence.words)
        .enumerate()
        .map(|(i, (token, word))| {
            let stress = Stress::from_token(token).unwrap_or_else(|| classify_stress(&word.clean));
            stress_token(stress, i == last, direction)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a complete annotation from the sentence alone.
pub fn synthesize(sentence: &Sentence) -> ProsodyAnnotation {
    if sentence.is_empty() {
        return ProsodyAnnotation::default();
    }
    let links = link_decisions(sentence);

    let words: Vec<&str> = sentence.words.iter().map(|w| w.text.as_str()).collect();
    let linked = join_with_links(&words, &links, LINK_MARK);

    let intonation_map = generate_intonation_map(sentence);

    for word in sentence.words.iter().filter(|w| !is_known(&w.clean)) {
        log::debug!("No lexicon entry for {:?}, using its spelling", word.clean);
    }
    let ipa: Vec<String> = sentence.words.iter().map(|w| lookup_phonetic(&w.clean)).collect();
    let raw_phonetic = join_with_links(&ipa, &links, SYLLABLE_BOUNDARY);
    let phonetic = repair_aligned(&linked, &intonation_map, &raw_phonetic);

    ProsodyAnnotation {
        full_linked_sentence: linked,
        intonation_map,
        full_linked_phonetic: phonetic,
    }
}

/// Rough completeness check: at least 60% as many phonetic segments as words.
pub fn is_phonetic_complete(text: &str, phonetic: &str) -> bool {
    if phonetic.trim().is_empty() {
        return false;
    }
    let word_count = text
        .split(|c: char| c.is_whitespace() || c == LINK_MARK)
        .filter(|w| w.chars().any(|c| !"?.!,;".contains(c)))
        .count();
    let segment_count = phonetic
        .split(|c: char| c.is_whitespace() || c == LINK_MARK || c == SYLLABLE_BOUNDARY)
        .filter(|s| !s.is_empty())
        .count();
    if (segment_count as f64) < word_count as f64 * MIN_PHONETIC_COVERAGE {
        log::warn!(
            "Phonetic seems incomplete: {} segments for {} words",
            segment_count,
            word_count
        );
        return false;
    }
    true
}

/// Accept a valid external annotation (normalized and repaired) or synthesize one.
///
/// The returned intonation map always has exactly one token per word.
pub fn accept(sentence: &Sentence, external: Option<&RawAnnotation>) -> ProsodyAnnotation {
    if sentence.is_empty() {
        return ProsodyAnnotation::default();
    }
    let Some(raw) = external else {
        log::debug!("No external annotation for {:?}, synthesizing", sentence.text);
        return synthesize(sentence);
    };
    let (linked, map, phonetic) = match checked_fields(raw, sentence) {
        Ok(fields) => fields,
        Err(e) => {
            log::warn!("Invalid annotation for {:?} ({}), regenerating", sentence.text, e);
            return synthesize(sentence);
        }
    };

    let mut linked = normalize_linked_sentence(linked);
    let intonation_map = normalize_intonation_map(map, sentence);
    let mut phonetic = repair_aligned(&linked, &intonation_map, phonetic);

    if linked.is_empty() || !is_phonetic_complete(&linked, &phonetic) {
        log::warn!("Replacing unusable phonetic for {:?}", sentence.text);
        let fallback = synthesize(sentence);
        if linked.is_empty() {
            linked = fallback.full_linked_sentence;
        }
        phonetic = fallback.full_linked_phonetic;
    }

    ProsodyAnnotation {
        full_linked_sentence: linked,
        intonation_map,
        full_linked_phonetic: phonetic,
    }
}

/// Annotate a sentence, using the external annotation when it is usable.
pub fn annotate(text: &str, external: Option<&RawAnnotation>) -> ProsodyAnnotation {
    accept(&Sentence::parse(text), external)
}

/// Annotate a sentence from the raw text of a model reply, if there is one.
pub fn annotate_response(text: &str, response: Option<&str>) -> ProsodyAnnotation {
    match response.map(parse_model_response) {
        Some(Ok(raw)) => annotate(text, Some(&raw)),
        Some(Err(e)) => {
            log::warn!("Could not parse model response: {}", e);
            annotate(text, None)
        }
        None => annotate(text, None),
    }
}
