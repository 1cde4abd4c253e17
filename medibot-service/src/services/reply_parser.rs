//! Turning the model's free text into a [`ClassifiedReply`].
//!
//! The model is asked for a bare JSON object but often wraps it in a markdown code
//! block, and sometimes ignores the format entirely. Neither case is an error.

use crate::models::{ClassifiedReply, ConditionLevel, FALLBACK_REPLY};
use serde_json::Value;

const FENCE: &str = "```";

/// Remove one surrounding markdown code block.
///
/// If the trimmed text opens with ```` ``` ```` (optionally tagged `json`, any case),
/// the opening marker, the tag and a matching closing ```` ``` ```` are dropped and
/// the inner content is returned trimmed. Text that does not open with a fence is
/// returned unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let Some(body) = text.trim().strip_prefix(FENCE) else {
        return text;
    };

    let body = body.trim_start_matches([' ', '\t']);
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Decode the model text into a reply.
///
/// A JSON object yields its `response`, `conditionLevel` and `note` string fields,
/// each optional. Anything that does not parse is relayed as the raw text with no
/// classification.
pub fn parse_model_reply(raw: &str) -> ClassifiedReply {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(parsed) => {
            let field = |name: &str| {
                parsed
                    .get(name)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            };

            ClassifiedReply {
                reply: field("response").unwrap_or(FALLBACK_REPLY).to_string(),
                condition_level: field("conditionLevel")
                    .map(ConditionLevel::from_model)
                    .unwrap_or_default(),
                note: field("note").unwrap_or_default().to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                text_len = raw.len(),
                "Failed to parse model reply as JSON, relaying raw text"
            );
            ClassifiedReply::unclassified(raw)
        }
    }
}
