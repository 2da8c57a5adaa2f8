use serde_json::Value;

use crate::models::turn::NO_REPLY_SENTINEL;

/// A backend reply normalized out of its three legacy encodings. All shape
/// tolerance lives here so the assistant-signature heuristic below only ever
/// sees one canonical list of turn-like records.
#[derive(Debug)]
pub enum BackendReply {
    Text(String),
    Turns(Vec<Value>),
    Unrecognized(Value),
}

pub fn classify(raw: Value) -> BackendReply {
    match raw {
        Value::String(text) => BackendReply::Text(text),
        Value::Array(items) => BackendReply::Turns(items),
        Value::Object(mut map) => match map.remove("messages") {
            Some(Value::Array(items)) => BackendReply::Turns(items),
            Some(other) => {
                map.insert("messages".to_string(), other);
                BackendReply::Unrecognized(Value::Object(map))
            }
            None => BackendReply::Unrecognized(Value::Object(map)),
        },
        other => BackendReply::Unrecognized(other),
    }
}

/// Locate the authoritative assistant utterance in a raw backend response.
///
/// Best effort by design: the backend's turn objects carry no stable
/// discriminator, so resolution degrades (stringify, assume the last entry)
/// rather than failing the exchange. Never returns an error.
pub fn resolve_reply(raw: Value) -> String {
    match classify(raw) {
        BackendReply::Text(text) => text,
        BackendReply::Turns(items) => {
            if items.is_empty() {
                return NO_REPLY_SENTINEL.to_string();
            }
            if let Some(turn) = items.iter().rev().find(|t| is_assistant_authored(t)) {
                return turn_text(turn);
            }
            // Nothing matched the signature; assume the most recent entry
            // is the reply.
            match items.last() {
                Some(turn) => turn_text(turn),
                None => NO_REPLY_SENTINEL.to_string(),
            }
        }
        BackendReply::Unrecognized(value) => value.to_string(),
    }
}

fn is_assistant_authored(turn: &Value) -> bool {
    let Some(obj) = turn.as_object() else {
        return false;
    };
    if obj.get("type").and_then(Value::as_str) == Some("ai") {
        return true;
    }
    if obj.get("role").and_then(Value::as_str) == Some("assistant") {
        return true;
    }
    // Tolerant fallback: an untagged object with a content-bearing field is
    // assumed to be an assistant turn by elimination, since user turns are
    // always the caller's own typed input. Unsound if the backend ever
    // echoes an untagged user turn.
    (obj.contains_key("content") || obj.contains_key("text"))
        && !obj.contains_key("type")
        && !obj.contains_key("role")
}

fn turn_text(turn: &Value) -> String {
    turn.get("content")
        .and_then(Value::as_str)
        .or_else(|| turn.get("text").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| turn.to_string())
}
