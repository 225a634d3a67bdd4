//! # API Layer
//!
//! Request normalization, authentication, and the shared response envelope.
//! Everything here is pure with respect to the configuration session: the
//! session is only touched after a request has been normalized and its key
//! authenticated.

pub mod auth;
pub mod command;
pub mod errors;
pub mod normalize;
pub mod response;

pub use command::{Command, CommandBatch, ConfigOp};
pub use errors::{ApiError, ApiResult};
pub use response::ResponseEnvelope;
