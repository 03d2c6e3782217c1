//! Tolerant parsing of classification oracle replies.
//!
//! The oracle is instructed to answer with strict JSON, but small local
//! models routinely wrap the object in prose or code fences. Parsing is
//! two-stage: try the raw string, then the substring between the first
//! `{` and the last `}`. Anything else degrades to "nothing found" --
//! a malformed reply must never fail the pipeline.

use serde_json::Value;

use super::IntentKind;

/// What the classification oracle had to say about one email.
///
/// `kind == None` covers the literal `{"type": "none"}` sentinel, an
/// unknown type label, a missing field, and an unparseable reply alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OracleReply {
    pub kind: Option<IntentKind>,
    pub title: Option<String>,
}

impl OracleReply {
    /// Reply meaning "no actionable content".
    pub fn none() -> Self {
        Self::default()
    }
}

/// Parse a raw oracle reply, however mangled.
pub fn parse_reply(raw: &str) -> OracleReply {
    let raw = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return reply_from_value(&value);
    }

    // Model wrapped the JSON in prose; take the outermost braces.
    let start = raw.find('{');
    let end = raw.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&raw[start..=end]) {
                return reply_from_value(&value);
            }
        }
    }

    OracleReply::none()
}

fn reply_from_value(value: &Value) -> OracleReply {
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(|label| IntentKind::from_label(&label.trim().to_lowercase()));

    let title = value
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    OracleReply { kind, title }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_json() {
        let reply = parse_reply(r#"{"type": "meeting", "title": "Sync with Priya"}"#);
        assert_eq!(reply.kind, Some(IntentKind::Meeting));
        assert_eq!(reply.title.as_deref(), Some("Sync with Priya"));
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let raw = "Sure! Here is the JSON:\n```json\n{\"type\": \"exam\"}\n``` Hope that helps.";
        let reply = parse_reply(raw);
        assert_eq!(reply.kind, Some(IntentKind::Exam));
        assert_eq!(reply.title, None);
    }

    #[test]
    fn none_sentinel_degrades_to_empty_reply() {
        assert_eq!(parse_reply(r#"{"type": "none"}"#), OracleReply::none());
    }

    #[test]
    fn garbage_degrades_to_empty_reply() {
        assert_eq!(parse_reply("I could not find anything."), OracleReply::none());
        assert_eq!(parse_reply(""), OracleReply::none());
        assert_eq!(parse_reply("{broken"), OracleReply::none());
    }

    #[test]
    fn unknown_type_label_degrades_to_empty_kind() {
        let reply = parse_reply(r#"{"type": "celebration", "title": "Party"}"#);
        assert_eq!(reply.kind, None);
        assert_eq!(reply.title.as_deref(), Some("Party"));
    }

    #[test]
    fn type_label_is_case_insensitive() {
        let reply = parse_reply(r#"{"type": " Meeting "}"#);
        assert_eq!(reply.kind, Some(IntentKind::Meeting));
    }
}
