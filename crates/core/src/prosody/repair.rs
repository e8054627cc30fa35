//! Cleanup of model-generated IPA before it is shown to a learner.
//!
//! The pipeline runs in a fixed order: strip punctuation artifacts and
//! secondary stress, collapse whitespace, patch known omissions, normalize
//! linking boundaries against the orthographic linked sentence, then add
//! primary stress to content words that lack it. It never fails; when the
//! phonetic cannot be aligned word-for-word it falls back to marking every
//! segment that does not look like a function word.

use std::collections::HashSet;

use regex::Regex;

use crate::language::lexicon::is_function_word_phonetic;
use crate::language::linking::{create_linked_sentence, join_with_links};
use crate::language::stress::classify_stress;
use crate::prosody::annotator::generate_intonation_map;
use crate::types::{
    clean_word, Sentence, Stress, LINK_MARK, PRIMARY_STRESS, SECONDARY_STRESS, SYLLABLE_BOUNDARY,
};

lazy_static::lazy_static! {
    /// ASCII, fullwidth and ideographic commas.
    static ref COMMAS: Regex = Regex::new("[,\u{FF0C}\u{3001}]").expect("valid comma pattern");
    /// Slashes and brackets wrapped around a transcription.
    static ref IPA_DELIMITERS: Regex = Regex::new(r"[/\[\]]").expect("valid delimiter pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
    /// Any run of link or boundary marks with the whitespace around it.
    static ref BOUNDARY_RUN: Regex = Regex::new(r"\s*[‿.]+\s*").expect("valid boundary pattern");
    static ref LINK_RUN: Regex = Regex::new(r"\s*‿+\s*").expect("valid link pattern");
}

/// First characters that make an IPA fragment vowel-initial.
const IPA_VOWELS: &str = "aeiouæɑɒɔəɛɜɪʊʌɚɝ";

/// Words of a linked sentence, grouped by `‿`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkGroups {
    groups: Vec<Vec<String>>,
}

impl LinkGroups {
    fn parse(linked_sentence: &str) -> Self {
        let normalized = normalize_linked_sentence(linked_sentence);
        let groups = normalized
            .split_whitespace()
            .map(|group| {
                group
                    .split(LINK_MARK)
                    .filter(|w| !w.is_empty())
                    .map(clean_word)
                    .collect::<Vec<_>>()
            })
            .filter(|g| !g.is_empty())
            .collect();
        Self { groups }
    }

    fn word_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Per adjacent word pair: linked inside a group, unlinked between groups.
    fn link_flags(&self) -> Vec<bool> {
        let mut flags = Vec::new();
        for (gi, group) in self.groups.iter().enumerate() {
            flags.extend(std::iter::repeat(true).take(group.len().saturating_sub(1)));
            if gi + 1 < self.groups.len() {
                flags.push(false);
            }
        }
        flags
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }
}

/// Tidy the linking glyphs of an orthographic linked sentence.
pub(crate) fn normalize_linked_sentence(linked_sentence: &str) -> String {
    let linked = LINK_RUN.replace_all(linked_sentence.trim(), "‿");
    let linked = WHITESPACE.replace_all(&linked, " ");
    linked.trim_matches(LINK_MARK).trim().to_string()
}

/// Repair a phonetic string for a plain sentence.
///
/// The linked sentence and stress pattern are derived from `sentence_text`.
pub fn repair(sentence_text: &str, raw_phonetic: &str) -> String {
    let sentence = Sentence::parse(sentence_text);
    repair_aligned(
        &create_linked_sentence(sentence_text),
        &generate_intonation_map(&sentence),
        raw_phonetic,
    )
}

/// Repair a phonetic string against an explicit linked sentence and intonation map.
pub fn repair_aligned(linked_sentence: &str, intonation_map: &str, raw_phonetic: &str) -> String {
    let groups = LinkGroups::parse(linked_sentence);
    let cleaned = strip_artifacts(raw_phonetic);
    if cleaned.is_empty() {
        return cleaned;
    }
    let patched = fix_known_omissions(&cleaned, &groups);
    let linked = normalize_boundaries(&patched, &groups);
    let tokens: Vec<&str> = intonation_map.split_whitespace().collect();
    let stressed = inject_primary_stress(&linked, &groups, &tokens);
    if stressed != raw_phonetic {
        log::debug!("Repaired phonetic {:?} -> {:?}", raw_phonetic, stressed);
    }
    stressed
}

/// Remove commas, delimiters and secondary stress; collapse whitespace.
fn strip_artifacts(raw: &str) -> String {
    let no_commas = COMMAS.replace_all(raw, "");
    let no_delims = IPA_DELIMITERS.replace_all(&no_commas, "");
    let no_secondary: String = no_delims.chars().filter(|&c| c != SECONDARY_STRESS).collect();
    WHITESPACE.replace_all(&no_secondary, " ").trim().to_string()
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == SYLLABLE_BOUNDARY || c == LINK_MARK
}

/// Split into fragments, each with the separator that follows it.
fn split_fragments(s: &str) -> Vec<(String, Option<char>)> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if is_separator(c) {
            out.push((std::mem::take(&mut current), Some(c)));
        } else {
            current.push(c);
        }
    }
    out.push((current, None));
    out
}

fn join_fragments(fragments: &[(String, Option<char>)]) -> String {
    let mut out = String::new();
    for (fragment, sep) in fragments {
        out.push_str(fragment);
        if let Some(sep) = sep {
            out.push(*sep);
        }
    }
    out
}

/// Patch sounds the model is known to drop, only for words the sentence contains.
fn fix_known_omissions(phonetic: &str, groups: &LinkGroups) -> String {
    let words: HashSet<&str> = groups.words().collect();
    let has_this = words.contains("this");
    let has_does = words.contains("does");
    let goes_only = words.contains("goes") && !words.contains("go");
    if !(has_this || has_does || goes_only) {
        return phonetic.to_string();
    }

    let mut fragments = split_fragments(phonetic);
    for i in 0..fragments.len() {
        // Look past empty fragments (" ‿ ", "..") and a leading primary stress
        let next_is_vowel = fragments[i + 1..]
            .iter()
            .map(|(f, _)| f.trim_start_matches(PRIMARY_STRESS))
            .find(|f| !f.is_empty())
            .and_then(|f| f.chars().next())
            .map(|c| IPA_VOWELS.contains(c))
            .unwrap_or(false);
        let has_next = fragments[i].1.is_some();
        let current = fragments[i].0.clone();
        match current.as_str() {
            // "this" before a vowel keeps its /s/ and links to it
            "ðɪ" if has_this && next_is_vowel && has_next => {
                fragments[i].0.push('s');
                fragments[i].1 = Some(SYLLABLE_BOUNDARY);
            }
            "dʌ" if has_does => fragments[i].0.push('z'),
            "goʊ" | "ɡoʊ" if goes_only => fragments[i].0.push('z'),
            _ => {}
        }
    }
    join_fragments(&fragments)
}

/// Use a single `.` wherever the sentence links two words, never `‿`.
fn normalize_boundaries(phonetic: &str, groups: &LinkGroups) -> String {
    let collapsed = BOUNDARY_RUN.replace_all(phonetic, ".");
    let collapsed = collapsed
        .trim_matches(|c: char| c == SYLLABLE_BOUNDARY || c == ' ')
        .to_string();

    let flags = groups.link_flags();

    // One segment per word: re-join at the orthographic link positions
    let segments: Vec<&str> = collapsed.split(' ').collect();
    if segments.len() == groups.word_count() && segments.len() > groups.groups.len() {
        return join_with_links(&segments, &flags, SYLLABLE_BOUNDARY);
    }

    // Partly linked, one piece per word: add the missing boundaries. Only
    // spaces turn into `.`, so a `.` where the words do not link means the
    // pieces are syllables rather than words.
    let pieces = split_fragments(&collapsed);
    let word_aligned = pieces.len() == groups.word_count()
        && pieces.iter().all(|(piece, _)| !piece.is_empty())
        && pieces
            .iter()
            .zip(&flags)
            .all(|((_, sep), &linked)| linked || *sep != Some(SYLLABLE_BOUNDARY));
    if word_aligned {
        let words: Vec<&str> = pieces.iter().map(|(piece, _)| piece.as_str()).collect();
        return join_with_links(&words, &flags, SYLLABLE_BOUNDARY);
    }
    collapsed
}

fn with_primary_stress(fragment: &str) -> String {
    format!("{}{}", PRIMARY_STRESS, fragment)
}

/// Add `ˈ` to stressed words that carry no primary stress yet.
fn inject_primary_stress(phonetic: &str, groups: &LinkGroups, tokens: &[&str]) -> String {
    let segments: Vec<&str> = phonetic.split(' ').collect();
    let exact = segments.len() == groups.groups.len() && groups.word_count() == tokens.len();

    if exact {
        log::debug!("Stress alignment: exact ({} segments)", segments.len());
        let mut index = 0;
        let mut out = Vec::with_capacity(segments.len());
        for (segment, group) in segments.iter().zip(&groups.groups) {
            let flags: Vec<bool> = group
                .iter()
                .zip(&tokens[index..index + group.len()])
                .map(|(word, token)| {
                    Stress::from_token(token).unwrap_or_else(|| classify_stress(word))
                        == Stress::Stressed
                })
                .collect();
            index += group.len();

            let parts: Vec<&str> = segment.split(SYLLABLE_BOUNDARY).collect();
            if parts.len() == flags.len() {
                let marked: Vec<String> = parts
                    .iter()
                    .zip(&flags)
                    .map(|(part, &stressed)| {
                        if stressed && !part.contains(PRIMARY_STRESS) && !part.is_empty() {
                            with_primary_stress(part)
                        } else {
                            part.to_string()
                        }
                    })
                    .collect();
                out.push(marked.join("."));
            } else if flags.iter().any(|&s| s) && !segment.contains(PRIMARY_STRESS) {
                out.push(with_primary_stress(segment));
            } else {
                out.push(segment.to_string());
            }
        }
        return out.join(" ");
    }

    log::debug!(
        "Stress alignment: fallback ({} segments, {} groups, {} tokens)",
        segments.len(),
        groups.groups.len(),
        tokens.len()
    );
    segments
        .iter()
        .map(|segment| {
            let leading = segment.split(SYLLABLE_BOUNDARY).next().unwrap_or(segment);
            if segment.is_empty()
                || segment.contains(PRIMARY_STRESS)
                || is_function_word_phonetic(leading)
            {
                segment.to_string()
            } else {
                with_primary_stress(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
