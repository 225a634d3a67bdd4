//! # Operational-Mode Routes
//!
//! generate / show / reset: one endpoint per command family, each accepting
//! only its own op value. Like retrieve, these read or act outside the
//! configure transaction and take no lock.

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
        .route("/generate", post(generate_handler))
        .route("/show", post(show_handler))
        .route("/reset", post(reset_handler))
        .with_state(state)
}

async fn generate_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let (op, path) = op_and_path(&state, raw)?;
    if op != "generate" {
        return Err(ApiError::invalid_operation(&op));
    }
    let output = state.session.generate(&path)?;
    Ok(Json(ResponseEnvelope::success(Value::String(output))))
}

async fn show_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let (op, path) = op_and_path(&state, raw)?;
    if op != "show" {
        return Err(ApiError::invalid_operation(&op));
    }
    let output = state.session.show(&path)?;
    Ok(Json(ResponseEnvelope::success(Value::String(output))))
}

async fn reset_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let (op, path) = op_and_path(&state, raw)?;
    if op != "reset" {
        return Err(ApiError::invalid_operation(&op));
    }
    let output = state.session.reset(&path)?;
    Ok(Json(ResponseEnvelope::success(Value::String(output))))
}

fn op_and_path(state: &ApiState, raw: RawBody) -> Result<(String, Vec<String>), ApiError> {
    let payload = state.authenticate(raw)?;
    let op = normalize::require_str(&payload, "op")?;
    let path = normalize::require_path(&payload)?;
    Ok((op, path))
}
