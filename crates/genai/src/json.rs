//! Recovering JSON from model text output.
//!
//! Models sometimes wrap JSON in prose or markdown fences even when asked
//! for JSON only.

use serde::de::DeserializeOwned;

use crate::error::AiError;

/// The first `{...}` or `[...]` span, from the earliest opening bracket to
/// the last matching closing bracket.
pub fn extract_json_span(text: &str) -> Option<&str> {
    for (start, c) in text.char_indices() {
        let close = match c {
            '{' => '}',
            '[' => ']',
            _ => continue,
        };
        if let Some(end) = text.rfind(close) {
            if end > start {
                return Some(&text[start..=end]);
            }
        }
    }
    None
}

/// Remove markdown code fences (```` ```json ```` and ```` ``` ````).
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the JSON span of `text` into `T`.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let candidate = extract_json_span(text).unwrap_or(text);
    serde_json::from_str(candidate).map_err(|e| {
        tracing::warn!(error = %e, len = text.len(), "Model returned unparseable JSON");
        AiError::unexpected_format(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_extracts_object_from_prose() {
        let text = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nEnjoy.";
        assert_eq!(extract_json_span(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extracts_array() {
        assert_eq!(extract_json_span("x [1, 2] y"), Some("[1, 2]"));
    }

    #[test]
    fn test_no_span() {
        assert_eq!(extract_json_span("nothing here"), None);
        assert_eq!(extract_json_span("} backwards {"), None);
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_code_fences("```json\n{\"x\":1}\n```"), "{\"x\":1}");
    }

    #[test]
    fn test_parse_failure_is_unexpected_format() {
        let result: Result<Value, _> = parse_model_json("I cannot help with that.");
        assert!(matches!(result, Err(AiError::UnexpectedFormat { .. })));
    }
}
