//! # HTTP Server
//!
//! Router assembly and shared state. One `ApiState` is built at startup and
//! passed into every handler; it owns the gateway configuration, the shared
//! session handle, and the transaction coordinator.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{auth, normalize};
use crate::api::errors::ApiResult;
use crate::api::normalize::RawBody;
use crate::config::GatewayConfig;
use crate::session::{ConfigSession, TransactionCoordinator};

use super::config::HttpServerConfig;
use super::{
    config_file_routes, configure_routes, container_image_routes, image_routes, op_mode_routes,
    retrieve_routes,
};

/// Shared state for all handlers
pub struct ApiState {
    pub config: GatewayConfig,
    pub session: Arc<dyn ConfigSession>,
    pub coordinator: TransactionCoordinator<dyn ConfigSession>,
}

impl ApiState {
    pub fn new(config: GatewayConfig, session: Arc<dyn ConfigSession>) -> Self {
        let coordinator = TransactionCoordinator::new(session.clone());
        Self {
            config,
            session,
            coordinator,
        }
    }

    /// Merge the raw body and authenticate its API key. Every route starts
    /// here; nothing touches the session until this has succeeded.
    pub fn authenticate(&self, raw: RawBody) -> ApiResult<Value> {
        let payload = normalize::merge_payload(raw)?;
        let key = normalize::api_key(&payload)?;
        let id = auth::authenticate(key, &self.config.api_keys)?;
        tracing::debug!(identity = %id, "authenticated request");
        Ok(payload)
    }
}

/// Gateway HTTP server
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(state: Arc<ApiState>) -> Self {
        let config = state.config.http.clone();
        let router = build_router(state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        tracing::info!(%addr, "starting gateway HTTP server");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}

/// Build the combined router with all endpoints
pub fn build_router(state: Arc<ApiState>) -> Router {
    let cors = if state.config.http.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = state
            .config
            .http
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(configure_routes::routes(state.clone()))
        .merge(retrieve_routes::routes(state.clone()))
        .merge(config_file_routes::routes(state.clone()))
        .merge(image_routes::routes(state.clone()))
        .merge(container_image_routes::routes(state.clone()))
        .merge(op_mode_routes::routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
