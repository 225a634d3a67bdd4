//! # Canonical Commands
//!
//! The normalized `{op, path, value?}` structure used internally regardless of
//! wire encoding, plus the batch shape the configure route executes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One configuration mutation, already validated.
///
/// Constructed fresh per request by the normalizer and discarded after the
/// handler returns; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub op: String,
    pub path: Vec<String>,
    pub value: Option<String>,
}

/// An ordered batch of commands plus the API key that submitted them.
///
/// Commands execute in submitted sequence; the first failure aborts the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    pub key: String,
    pub commands: Vec<Command>,
}

/// Operations the configure route accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOp {
    Set,
    Delete,
    Comment,
}

impl FromStr for ConfigOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(ConfigOp::Set),
            "delete" => Ok(ConfigOp::Delete),
            "comment" => Ok(ConfigOp::Comment),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ConfigOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOp::Set => write!(f, "set"),
            ConfigOp::Delete => write!(f, "delete"),
            ConfigOp::Comment => write!(f, "comment"),
        }
    }
}
