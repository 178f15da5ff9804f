//!
//! Lenient JSON decoding helpers for values that may arrive either as
//! already-parsed objects or as JSON text (e.g. SDK configuration
//! passed through element attributes or `postMessage()` payloads).
//!

use serde_json::Value;

/// Parse `json`, returning `None` if it is not valid JSON.
pub fn try_parse_json(json: &str) -> Option<Value> {
    serde_json::from_str(json).ok()
}

/// Returns `true` if `input` is an object or a string that looks like a JSON object.
pub fn is_obj_or_json(input: &Value) -> bool {
    match input {
        Value::Object(_) => true,
        Value::String(text) => text.starts_with('{'),
        _ => false,
    }
}

/// Return `input` if it is an object, otherwise try to parse it as JSON text.
pub fn obj_or_parse_json(input: &Value) -> Option<Value> {
    match input {
        Value::Object(_) => Some(input.clone()),
        Value::String(text) => try_parse_json(text),
        _ => None,
    }
}

/// Decode `input` into a JSON object.
pub fn decode_json(input: &Value) -> Option<Value> {
    if !is_obj_or_json(input) {
        return None;
    }
    obj_or_parse_json(input)
}
