//! # Config-File Route
//!
//! Save the running configuration to a file, or load one into the session.
//! `save` defaults to the boot config when no file is named; `load` always
//! requires one.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::normalize::{self, RawBody};
use crate::api::response::ResponseEnvelope;
use crate::config::DEFAULT_CONFIG_FILE;

use super::server::ApiState;

pub fn routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/config-file", post(config_file_handler))
        .with_state(state)
}

async fn config_file_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let payload = state.authenticate(raw)?;
    let op = normalize::require_str(&payload, "op")?;

    let output = match op.as_str() {
        "save" => {
            let file = normalize::optional_str(&payload, "file")?
                .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
            state.session.save(&file)?
        }
        "load" => {
            let file = normalize::require_str(&payload, "file")?;
            state.session.load(&file)?
        }
        other => return Err(ApiError::invalid_operation(other)),
    };

    Ok(Json(ResponseEnvelope::success(Value::String(output))))
}
