//! Prompt templates and reply parsing.

use serde::Deserialize;
use thiserror::Error;

/// Characters of document text sent to the model.
pub const MAX_DOCUMENT_CHARS: usize = 2000;

pub const SYSTEM_PROMPT: &str = "\
You are a compliance analyst. Given a certification or regulatory item and the text of an \
official web page, state how long the certificate or approval stays valid before renewal.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{\"validity_period\": \"3 Years\"}

Use a number and a unit (e.g. \"3 Years\", \"18 Months\") or \"Annual\".
If the page does not state a validity period, respond with {\"validity_period\": null}.";

pub fn build_user_prompt(subject: &str, document_text: &str) -> String {
    let text: String = document_text.chars().take(MAX_DOCUMENT_CHARS).collect();
    format!(
        "Item: {subject}\n\
         \n\
         Page text:\n\
         {text}"
    )
}

#[derive(Deserialize)]
struct ValidityReply {
    validity_period: Option<String>,
}

/// Why a model reply could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("reply contained no JSON object")]
    NoJson,
    #[error("reply JSON was invalid: {0}")]
    Invalid(String),
}

/// Pull the validity period out of a model reply.
///
/// Reasoning blocks (`<think>...</think>`) are dropped, then the span from
/// the first `{` to the last `}` is parsed. A null, empty, or "unknown"
/// value is no claim.
pub fn parse_validity_reply(reply: &str) -> Result<Option<String>, ReplyError> {
    let reply = strip_think(reply);
    let start = reply.find('{').ok_or(ReplyError::NoJson)?;
    let end = reply.rfind('}').ok_or(ReplyError::NoJson)?;
    if end < start {
        return Err(ReplyError::NoJson);
    }

    let parsed: ValidityReply = serde_json::from_str(&reply[start..=end])
        .map_err(|e| ReplyError::Invalid(e.to_string()))?;

    Ok(parsed
        .validity_period
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown")))
}

fn strip_think(reply: &str) -> &str {
    match reply.rfind("</think>") {
        Some(pos) => &reply[pos + "</think>".len()..],
        None => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_truncates_document() {
        let doc = "x".repeat(5000);
        let prompt = build_user_prompt("ISO 9001", &doc);
        assert!(prompt.starts_with("Item: ISO 9001"));
        assert_eq!(prompt.matches('x').count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn parses_bare_json() {
        assert_eq!(
            parse_validity_reply(r#"{"validity_period": "3 Years"}"#),
            Ok(Some("3 Years".into()))
        );
    }

    #[test]
    fn parses_json_inside_prose() {
        let reply = "Sure! Here it is:\n```json\n{\"validity_period\": \" Annual \"}\n```";
        assert_eq!(parse_validity_reply(reply), Ok(Some("Annual".into())));
    }

    #[test]
    fn drops_reasoning_block() {
        let reply = "<think>maybe {\"validity_period\": \"1 Year\"}?</think>{\"validity_period\": \"3 Years\"}";
        assert_eq!(parse_validity_reply(reply), Ok(Some("3 Years".into())));
    }

    #[test]
    fn null_and_unknown_are_no_claim() {
        assert_eq!(parse_validity_reply(r#"{"validity_period": null}"#), Ok(None));
        assert_eq!(parse_validity_reply(r#"{"validity_period": "Unknown"}"#), Ok(None));
        assert_eq!(parse_validity_reply(r#"{"validity_period": ""}"#), Ok(None));
        assert_eq!(parse_validity_reply(r#"{}"#), Ok(None));
    }

    #[test]
    fn missing_json_is_an_error() {
        assert_eq!(parse_validity_reply("no idea"), Err(ReplyError::NoJson));
        assert_eq!(parse_validity_reply("} backwards {"), Err(ReplyError::NoJson));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_validity_reply(r#"{"validity_period": 3 Years}"#),
            Err(ReplyError::Invalid(_))
        ));
    }
}
