//! Word-level phonetics: lexicon, linking, stress and intonation.

pub mod intonation;
pub mod lexicon;
pub mod linking;
pub mod stress;

pub use intonation::classify_intonation;
pub use linking::{create_linked_sentence, should_link};
pub use stress::{classify_stress, is_function_word};
