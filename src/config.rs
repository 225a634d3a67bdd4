//! # Gateway Configuration
//!
//! The immutable configuration bag built once at process start and passed by
//! reference into every handler: API key table, strict/debug flags, HTTP
//! transport settings, and the engine helper location. Loaded from a JSON
//! file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::auth::ApiKeyEntry;
use crate::http_server::config::HttpServerConfig;
use crate::session::shell::ShellSessionConfig;

/// Default target for config-file save when the request names no file
pub const DEFAULT_CONFIG_FILE: &str = "/config/config.boot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Process-wide gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Provisioned API keys; requests must present one of these
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,

    /// Strict mode: `delete` must target an existing path/value
    #[serde(default)]
    pub strict: bool,

    /// Verbose request logging
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub session: ShellSessionConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            strict: false,
            debug: false,
            http: HttpServerConfig::default(),
            session: ShellSessionConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
