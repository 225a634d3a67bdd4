//! # Body Extraction
//!
//! Transport-level decoding of the three accepted body encodings into
//! [`RawBody`]. Only decoding happens here; normalization and validation of
//! the decoded value live in [`crate::api::normalize`], shared by all
//! encodings.

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;

use crate::api::errors::ApiError;
use crate::api::normalize::RawBody;

#[async_trait]
impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::Internal(format!("failed to read request body: {e}")))?;
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Validation(format!("Failed to parse JSON: {e}")))?;
            Ok(RawBody::Json(value))
        } else if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            let mut fields = HashMap::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                fields.insert(name, text);
            }
            Ok(RawBody::Form(fields))
        } else {
            // Everything else is treated as URL-encoded form data
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            Ok(RawBody::Form(fields))
        }
    }
}
