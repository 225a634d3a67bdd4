//! # Session Layer
//!
//! The boundary to the external configuration-session engine: the trait the
//! gateway programs against, the subprocess-backed production binding, an
//! in-memory stand-in, and the transaction coordinator that serializes
//! configure transactions.

pub mod coordinator;
pub mod engine;
pub mod memory;
pub mod shell;

pub use coordinator::TransactionCoordinator;
pub use engine::{ConfigSession, SessionError, SessionResult};
pub use memory::MemorySession;
pub use shell::{ShellSession, ShellSessionConfig};
