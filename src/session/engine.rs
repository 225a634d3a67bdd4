//! # Configuration Session Interface
//!
//! The external configuration-session engine accumulates edits until they are
//! committed or discarded. The gateway only ever talks to it through this
//! trait; the engine's own semantics (config-tree parsing, validation of
//! set/delete against the schema) live entirely on the other side.

use serde_json::Value;
use thiserror::Error;

/// Result type for engine calls
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures reported by (or while reaching) the engine
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Engine-reported failure: invalid path, semantic conflict, commit
    /// validation error. Surfaced to clients verbatim.
    #[error("{0}")]
    Domain(String),

    /// Failure to reach or run the engine at all. Never shown to clients.
    #[error("{0}")]
    Internal(String),
}

/// Handle to the shared configuration session.
///
/// Mutating calls (`set`/`delete`/`comment`) stage edits in the session;
/// `commit` applies them atomically and may itself fail validation;
/// `discard` rolls back everything uncommitted. Read calls (`exists`,
/// `return_value`, `show_config`, ...) answer from the active configuration.
pub trait ConfigSession: Send + Sync {
    fn set(&self, path: &[String], value: Option<&str>) -> SessionResult<()>;
    fn delete(&self, path: &[String], value: Option<&str>) -> SessionResult<()>;
    fn comment(&self, path: &[String], value: Option<&str>) -> SessionResult<()>;
    fn commit(&self) -> SessionResult<String>;
    fn discard(&self) -> SessionResult<()>;

    fn save(&self, file: &str) -> SessionResult<String>;
    fn load(&self, file: &str) -> SessionResult<String>;

    fn install_image(&self, url: &str) -> SessionResult<String>;
    fn remove_image(&self, name: &str) -> SessionResult<String>;

    fn add_container_image(&self, name: &str) -> SessionResult<String>;
    fn delete_container_image(&self, name: &str) -> SessionResult<String>;
    fn show_container_image(&self) -> SessionResult<String>;

    fn generate(&self, path: &[String]) -> SessionResult<String>;
    fn show(&self, path: &[String]) -> SessionResult<String>;
    fn reset(&self, path: &[String]) -> SessionResult<String>;

    fn return_value(&self, path: &[String]) -> SessionResult<Option<String>>;
    fn return_values(&self, path: &[String]) -> SessionResult<Vec<String>>;
    /// Existence check against the active configuration, not the in-progress
    /// session. Strict-mode delete relies on this distinction.
    fn exists(&self, path: &[String]) -> SessionResult<bool>;
    /// Raw show-config text for a subtree of the active configuration
    fn show_config(&self, path: &[String]) -> SessionResult<String>;

    /// Re-encode raw show-config text as a nested JSON tree
    fn config_to_json(&self, raw: &str) -> SessionResult<Value>;
    /// Re-encode raw show-config text as the engine's JSON AST
    fn config_to_json_ast(&self, raw: &str) -> SessionResult<Value>;
}
