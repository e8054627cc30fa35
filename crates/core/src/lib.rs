//! Prosody annotation for American English pronunciation practice.
//!
//! Decides which adjacent words link, which words carry stress, whether the
//! sentence ends rising or falling, and produces a matching IPA
//! transcription. Annotations from a remote model are validated and
//! repaired, or regenerated locally when they do not fit the sentence.

pub mod cache;
pub mod history;
pub mod language;
pub mod prosody;
pub mod types;

pub use prosody::annotator::{annotate, annotate_response};
pub use types::{IntonationDirection, ProsodyAnnotation, RawAnnotation, Sentence, Stress};
