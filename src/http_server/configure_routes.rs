//! # Configure Route
//!
//! The one mutating endpoint. Normalizes the body into a command batch,
//! authenticates it, and hands it to the transaction coordinator, which
//! serializes it against every other configure caller.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::normalize::{self, RawBody};
use crate::api::response::ResponseEnvelope;

use super::server::ApiState;

pub fn routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/configure", post(configure_handler))
        .with_state(state)
}

async fn configure_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let payload = state.authenticate(raw)?;
    let key = normalize::api_key(&payload)?;
    let batch = normalize::command_batch(&payload, key)?;

    state
        .coordinator
        .run_configure(&batch.commands, state.config.strict)
        .await?;

    Ok(Json(ResponseEnvelope::success(Value::Null)))
}
