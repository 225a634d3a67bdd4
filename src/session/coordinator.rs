//! # Transaction Coordinator
//!
//! The process-wide mutual-exclusion wrapper around the shared configuration
//! session. The configure sequence (apply commands, then commit, discarding
//! on any failure) is the one stateful, concurrency-sensitive operation in
//! the gateway; everything runs inside a single coarse critical section so
//! two callers can never interleave their edits.
//!
//! Read-only routes deliberately do not take this lock and may observe
//! session state mid-transaction. That asymmetry is inherited behavior, kept
//! as documented.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::command::{Command, ConfigOp};
use crate::api::errors::{ApiError, ApiResult};

use super::engine::ConfigSession;

/// Serializes all configure transactions against one shared session.
///
/// The mutex is acquired exactly once per transaction, never nested, and the
/// guard drop releases it on every exit path. Acquisition is a plain blocking
/// wait bounded only by the preceding transaction's commit/discard; there is
/// no timeout and no cancellation.
pub struct TransactionCoordinator<S: ConfigSession + ?Sized> {
    session: Arc<S>,
    lock: Mutex<()>,
}

impl<S: ConfigSession + ?Sized> TransactionCoordinator<S> {
    pub fn new(session: Arc<S>) -> Self {
        Self {
            session,
            lock: Mutex::new(()),
        }
    }

    /// Run one configure transaction: apply every command in batch order,
    /// then commit. Any failure (apply, commit, or strict-mode check)
    /// discards all uncommitted edits before the error propagates.
    ///
    /// Operation strings are resolved before anything touches the session,
    /// so a batch with an unknown op fails without a single mutation.
    pub async fn run_configure(&self, commands: &[Command], strict: bool) -> ApiResult<()> {
        let ops = resolve_ops(commands)?;

        let _guard = self.lock.lock().await;
        let result = self.apply_and_commit(&ops, commands, strict);
        if result.is_err() {
            if let Err(e) = self.session.discard() {
                tracing::warn!(error = %e, "failed to discard aborted transaction");
            }
        }
        result
    }

    fn apply_and_commit(
        &self,
        ops: &[ConfigOp],
        commands: &[Command],
        strict: bool,
    ) -> ApiResult<()> {
        for (op, cmd) in ops.iter().zip(commands) {
            match op {
                ConfigOp::Set => self.session.set(&cmd.path, cmd.value.as_deref())?,
                ConfigOp::Delete => {
                    if strict && !self.session.exists(&full_path(cmd))? {
                        return Err(ApiError::Domain(format!(
                            "Cannot delete [{}]: path/value does not exist",
                            full_path(cmd).join(" ")
                        )));
                    }
                    self.session.delete(&cmd.path, cmd.value.as_deref())?
                }
                ConfigOp::Comment => self.session.comment(&cmd.path, cmd.value.as_deref())?,
            }
        }
        self.session.commit()?;
        Ok(())
    }
}

fn resolve_ops(commands: &[Command]) -> ApiResult<Vec<ConfigOp>> {
    commands
        .iter()
        .map(|cmd| {
            cmd.op
                .parse::<ConfigOp>()
                .map_err(|()| ApiError::invalid_operation(&cmd.op))
        })
        .collect()
}

fn full_path(cmd: &Command) -> Vec<String> {
    let mut path = cmd.path.clone();
    if let Some(value) = &cmd.value {
        path.push(value.clone());
    }
    path
}
