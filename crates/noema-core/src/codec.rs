//! Best-effort structured-literal decoding of caller-supplied text.
//!
//! Values arrive as strings on the command surface. A string that looks like
//! a JSON literal is decoded before use; a decode failure is never an error,
//! the text is simply kept verbatim.

use serde_json::{json, Value};

/// Decode text that looks like a JSON literal; keep it verbatim otherwise.
pub fn decode_flexible(raw: &str) -> Value {
    if looks_structured(raw) {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

/// Like [`decode_flexible`], but plain text becomes `{"content": …}` so a
/// memory record's payload is always a mapping or a decoded literal.
pub fn decode_or_wrap(raw: &str) -> Value {
    if looks_structured(raw) {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }
    json!({ "content": raw })
}

fn looks_structured(raw: &str) -> bool {
    raw.starts_with('[') || raw.starts_with('{')
}
