//! # Container-Image Route
//!
//! Container image management: pull, remove, and list.

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
        .route("/container-image", post(container_image_handler))
        .with_state(state)
}

async fn container_image_handler(
    State(state): State<Arc<ApiState>>,
    raw: RawBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let payload = state.authenticate(raw)?;
    let op = normalize::require_str(&payload, "op")?;

    let output = match op.as_str() {
        "add" => {
            let name = normalize::require_str(&payload, "name")?;
            state.session.add_container_image(&name)?
        }
        "delete" => {
            let name = normalize::require_str(&payload, "name")?;
            state.session.delete_container_image(&name)?
        }
        "show" => state.session.show_container_image()?,
        other => return Err(ApiError::invalid_operation(other)),
    };

    Ok(Json(ResponseEnvelope::success(Value::String(output))))
}
