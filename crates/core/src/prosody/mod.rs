//! Prosody annotation: synthesis, validation and phonetic repair.

pub mod annotator;
pub mod repair;
pub mod response;

pub use annotator::{
    accept, annotate, annotate_response, synthesize, validate, AnnotationShapeError,
};
pub use repair::{repair, repair_aligned};
pub use response::{parse_model_response, ResponseError};
