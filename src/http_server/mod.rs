//! # HTTP Front-End
//!
//! Axum server exposing the gateway's endpoints, one route module per
//! operation family:
//!
//! - `/configure` - configuration mutations (set/delete/comment), serialized
//! - `/retrieve` - configuration queries
//! - `/config-file` - save/load the configuration file
//! - `/image`, `/container-image` - image management
//! - `/generate`, `/show`, `/reset` - operational-mode commands

pub mod config;
pub mod config_file_routes;
pub mod configure_routes;
pub mod container_image_routes;
pub mod extract;
pub mod image_routes;
pub mod op_mode_routes;
pub mod retrieve_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{build_router, ApiState, HttpServer};
