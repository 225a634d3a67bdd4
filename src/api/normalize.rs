//! # Request Normalization
//!
//! Converts an inbound request body into the canonical command representation.
//! Two physically different wire encodings (JSON bodies and form fields) must
//! produce byte-identical validation error text, so encoding-specific parsing
//! is isolated here in [`merge_payload`] and the operation-agnostic validation
//! pipeline below runs on the merged value for both encodings.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::command::{Command, CommandBatch};
use super::errors::{ApiError, ApiResult};

/// A request body after transport decoding, before normalization
#[derive(Debug, Clone)]
pub enum RawBody {
    /// `application/json` body, parsed
    Json(Value),
    /// `multipart/form-data` or URL-encoded fields, flattened to key/value
    Form(HashMap<String, String>),
}

/// Merge a raw body into one JSON value all routes consume.
///
/// JSON bodies pass through untouched. Form bodies must carry a non-empty
/// `data` field holding JSON; an array becomes the `commands` list, anything
/// else is the merge target directly (so a single bare command object is also
/// accepted at the top level). A form-level `key` field is copied in unless
/// the payload already defines one.
pub fn merge_payload(raw: RawBody) -> ApiResult<Value> {
    match raw {
        RawBody::Json(value) => Ok(value),
        RawBody::Form(fields) => {
            let data = fields
                .get("data")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ApiError::Validation("Non-empty \"data\" field is required".to_string())
                })?;
            let parsed: Value = serde_json::from_str(data)
                .map_err(|e| ApiError::Validation(format!("Failed to parse JSON: {}", e)))?;
            let mut merged = if parsed.is_array() {
                json!({ "commands": parsed })
            } else {
                parsed
            };
            if let Some(obj) = merged.as_object_mut() {
                if let Some(key) = fields.get("key") {
                    if !obj.contains_key("key") {
                        obj.insert("key".to_string(), Value::String(key.clone()));
                    }
                }
            }
            Ok(merged)
        }
    }
}

/// Extract the API key from a merged payload.
///
/// A missing or non-string key is indistinguishable from an unknown one at
/// the wire: both surface as 401.
pub fn api_key(payload: &Value) -> ApiResult<&str> {
    payload
        .get("key")
        .and_then(Value::as_str)
        .ok_or(ApiError::Unauthorized)
}

/// Build the canonical command batch from a merged payload.
///
/// If the payload has a `commands` key, that is the list; otherwise the
/// payload itself is wrapped as a single-element list. Each candidate runs
/// through [`validate_command`] in order, stopping at the first violation.
pub fn command_batch(payload: &Value, key: &str) -> ApiResult<CommandBatch> {
    let candidates: Vec<Value> = match payload.get("commands") {
        Some(Value::Array(list)) => list.clone(),
        Some(other) => vec![other.clone()],
        None => vec![payload.clone()],
    };

    let mut commands = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        commands.push(validate_command(candidate)?);
    }

    Ok(CommandBatch {
        key: key.to_string(),
        commands,
    })
}

/// Validate one candidate command against the canonical shape.
///
/// Checks run in a fixed order and stop at the first violation, so exactly
/// one message is ever reported per command. The offending candidate is
/// echoed back as compact JSON inside the message.
pub fn validate_command(candidate: &Value) -> ApiResult<Command> {
    let obj = candidate
        .as_object()
        .ok_or_else(|| malformed(candidate, "any command must be a JSON object"))?;

    // A non-string op is carried through as its JSON text; dispatch rejects
    // it as an invalid operation citing that exact text.
    let op = match obj.get("op") {
        None => return Err(malformed(candidate, "missing \"op\" field")),
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    };

    let path = obj
        .get("path")
        .ok_or_else(|| malformed(candidate, "missing \"path\" field"))?;

    if path_is_empty(path) {
        return Err(malformed(candidate, "empty path"));
    }

    let elements = path
        .as_array()
        .ok_or_else(|| malformed(candidate, "\"path\" field must be a list"))?;

    let path: Vec<String> = elements
        .iter()
        .map(|el| el.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| malformed(candidate, "\"path\" field must be a list of strings"))?;

    let value = match obj.get("value") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(malformed(candidate, "\"value\" field must be a string")),
    };

    // Any other fields (notably a top-level `key`) are dropped here and
    // never reach the engine.
    Ok(Command { op, path, value })
}

// Falsy values of any type count as empty; the emptiness check runs before
// the list-type check, so `0`, `false`, and `{}` report an empty path rather
// than a type violation.
fn path_is_empty(path: &Value) -> bool {
    match path {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn malformed(candidate: &Value, reason: &str) -> ApiError {
    let echo = serde_json::to_string(candidate).unwrap_or_default();
    ApiError::Validation(format!("Malformed command \"{}\": {}", echo, reason))
}

/// Require a string field in a merged payload, by name
pub fn require_str(payload: &Value, name: &str) -> ApiResult<String> {
    match payload.get(name) {
        None | Some(Value::Null) => Err(ApiError::missing_field(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::Validation(format!(
            "Field \"{}\" must be a string",
            name
        ))),
    }
}

/// Optional string field: absent is fine, wrong type is not
pub fn optional_str(payload: &Value, name: &str) -> ApiResult<Option<String>> {
    match payload.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::Validation(format!(
            "Field \"{}\" must be a string",
            name
        ))),
    }
}

/// Require a `path` field that is a list of strings
pub fn require_path(payload: &Value) -> ApiResult<Vec<String>> {
    let path = payload.get("path").ok_or_else(|| ApiError::missing_field("path"))?;
    path.as_array()
        .and_then(|els| {
            els.iter()
                .map(|el| el.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            ApiError::Validation("Field \"path\" must be a list of strings".to_string())
        })
}
