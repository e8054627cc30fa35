//! Parsing of raw language-model replies into a [`RawAnnotation`].
//!
//! Models often wrap the JSON in a Markdown code fence or add a sentence
//! of chatter around it, so the outermost `{...}` object is extracted before
//! deserializing.

use thiserror::Error;

use crate::types::RawAnnotation;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("model response is empty")]
    Empty,

    #[error("model response contains no JSON object")]
    NoJsonObject,

    #[error("model response is not valid annotation JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Drop Markdown code fences (```json ... ```).
fn strip_code_fences(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a model reply into an annotation whose fields may be missing.
pub fn parse_model_response(content: &str) -> Result<RawAnnotation, ResponseError> {
    let content = strip_code_fences(content);
    let content = content.trim();
    if content.is_empty() {
        return Err(ResponseError::Empty);
    }
    let start = content.find('{').ok_or(ResponseError::NoJsonObject)?;
    let end = content.rfind('}').ok_or(ResponseError::NoJsonObject)?;
    if end < start {
        return Err(ResponseError::NoJsonObject);
    }
    let raw: RawAnnotation = serde_json::from_str(&content[start..=end])?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = parse_model_response(
            r#"{"fullLinkedSentence":"I love you","intonationMap":"· ● ·↘","fullLinkedPhonetic":"aɪ lʌv ju"}"#,
        )
        .unwrap();
        assert_eq!(raw.full_linked_sentence.as_deref(), Some("I love you"));
        assert_eq!(raw.intonation_map.as_deref(), Some("· ● ·↘"));
        assert_eq!(raw.full_linked_phonetic.as_deref(), Some("aɪ lʌv ju"));
    }

    #[test]
    fn test_parse_fenced_json_with_chatter() {
        let reply = "Here you go:\n```json\n{\"intonationMap\": \"●↘\"}\n```\nHope this helps!";
        let raw = parse_model_response(reply).unwrap();
        assert_eq!(raw.intonation_map.as_deref(), Some("●↘"));
        assert!(raw.full_linked_phonetic.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_model_response(""), Err(ResponseError::Empty)));
        assert!(matches!(parse_model_response("```\n```"), Err(ResponseError::Empty)));
        assert!(matches!(
            parse_model_response("no json here"),
            Err(ResponseError::NoJsonObject)
        ));
        assert!(matches!(parse_model_response("} {"), Err(ResponseError::NoJsonObject)));
        assert!(matches!(
            parse_model_response("{\"intonationMap\": "),
            Err(ResponseError::NoJsonObject)
        ));
        assert!(matches!(
            parse_model_response("{\"intonationMap\": 3}"),
            Err(ResponseError::Json(_))
        ));
    }
}
