//! # API Key Authentication
//!
//! Static key table lookup. Keys are provisioned in the server configuration
//! and immutable for the process lifetime; the table is expected to hold a
//! handful of entries, so a linear scan is fine. Comparison is a plain string
//! match with no timing-attack mitigation.

use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};

/// One provisioned API key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    pub id: String,
    pub key: String,
}

/// Map a presented key to its identity id.
///
/// Missing and unknown keys are deliberately indistinguishable: both return
/// the same 401 error.
pub fn authenticate<'a>(presented: &str, table: &'a [ApiKeyEntry]) -> ApiResult<&'a str> {
    table
        .iter()
        .find(|entry| entry.key == presented)
        .map(|entry| entry.id.as_str())
        .ok_or(ApiError::Unauthorized)
}
