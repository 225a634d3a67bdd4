//! # Retrieve Route
//!
//! Read-only queries against the active configuration. Deliberately not
//! covered by the transaction lock, so a query may observe state while a
//! configure transaction is in flight.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::normalize::{self, RawBody};
use crate::api::response::ResponseEnvelope;

use super::server::ApiState;

/// How showConfig output is re-encoded before returning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    JsonAst,
    Raw,
}

impl FromStr for ConfigFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ConfigFormat::Json),
            "json_ast" => Ok(ConfigFormat::JsonAst),
            "raw" => Ok(ConfigFormat::Raw),
            other => Err(ApiError::Validation(format!(
                "\"{}\" is not a valid config format",
                other
            ))),
        }
    }
}

pub fn routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/retrieve", post(retrieve_handler))
        .with_state(state)
}

async fn retrieve_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let payload = state.authenticate(raw)?;
    let op = normalize::require_str(&payload, "op")?;
    let path = normalize::require_path(&payload)?;

    let data = match op.as_str() {
        "returnValue" => state
            .session
            .return_value(&path)?
            .map(Value::String)
            .unwrap_or(Value::Null),
        "returnValues" => Value::Array(
            state
                .session
                .return_values(&path)?
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        "exists" => Value::Bool(state.session.exists(&path)?),
        "showConfig" => {
            let format = normalize::optional_str(&payload, "configFormat")?
                .as_deref()
                .unwrap_or("json")
                .parse::<ConfigFormat>()?;
            let raw_config = state.session.show_config(&path)?;
            match format {
                ConfigFormat::Json => state.session.config_to_json(&raw_config)?,
                ConfigFormat::JsonAst => state.session.config_to_json_ast(&raw_config)?,
                ConfigFormat::Raw => Value::String(raw_config),
            }
        }
        other => return Err(ApiError::invalid_operation(other)),
    };

    Ok(Json(ResponseEnvelope::success(data)))
}
