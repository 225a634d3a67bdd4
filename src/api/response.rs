//! # Response Envelope
//!
//! The uniform success/error JSON shape shared by every route. Exactly one of
//! `data`/`error` is meaningfully populated, matching the `success` flag; both
//! keys are always present in the serialized body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response body for all routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub data: Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Successful response carrying `data` (which may be null)
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Failed response carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
        }
    }
}
