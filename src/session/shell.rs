//! # Shell Session
//!
//! Subprocess binding to the configuration engine's CLI helpers. Every trait
//! call maps to one short-lived helper invocation; a non-zero exit turns the
//! helper's stderr into a domain error, and a failure to spawn at all is an
//! internal error.
//!
//! Helper names are fixed; only the directory they live in is configurable,
//! so tests and packaging can point the gateway at stub or real helpers.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine::{ConfigSession, SessionError, SessionResult};

/// Where the engine's CLI helpers live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSessionConfig {
    #[serde(default = "default_helper_dir")]
    pub helper_dir: PathBuf,
}

fn default_helper_dir() -> PathBuf {
    PathBuf::from("/usr/libexec/configd")
}

impl Default for ShellSessionConfig {
    fn default() -> Self {
        Self {
            helper_dir: default_helper_dir(),
        }
    }
}

/// [`ConfigSession`] backed by the engine's CLI helpers
#[derive(Debug)]
pub struct ShellSession {
    config: ShellSessionConfig,
}

impl ShellSession {
    pub fn new(config: ShellSessionConfig) -> Self {
        Self { config }
    }

    fn run(&self, helper: &str, args: &[&str]) -> SessionResult<String> {
        let program = self.config.helper_dir.join(helper);
        tracing::debug!(helper = %program.display(), ?args, "invoking engine helper");
        let output = Command::new(&program).args(args).output().map_err(|e| {
            SessionError::Internal(format!("failed to run {}: {}", program.display(), e))
        })?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            Err(SessionError::Domain(failure_message(&output)))
        }
    }

    fn run_with_stdin(&self, helper: &str, input: &str) -> SessionResult<String> {
        let program = self.config.helper_dir.join(helper);
        let mut child = Command::new(&program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SessionError::Internal(format!("failed to run {}: {}", program.display(), e))
            })?;
        // Feed stdin from its own thread so the helper can stream output
        // while we are still writing; writing inline deadlocks once input
        // outgrows the pipe buffers and both ends fill.
        let mut stdin = child.stdin.take().ok_or_else(|| {
            SessionError::Internal(format!("failed to open stdin of {}", program.display()))
        })?;
        let payload = input.as_bytes().to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&payload));
        let output = child.wait_with_output().map_err(|e| {
            SessionError::Internal(format!("failed to run {}: {}", program.display(), e))
        })?;
        match writer.join() {
            Ok(Ok(())) => {}
            // A helper that exits without draining stdin closes the pipe;
            // its exit status already tells us whether that was a failure.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => {
                return Err(SessionError::Internal(format!(
                    "failed to write to {}: {}",
                    program.display(),
                    e
                )))
            }
            Err(_) => {
                return Err(SessionError::Internal(format!(
                    "failed to write to {}",
                    program.display()
                )))
            }
        }
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            Err(SessionError::Domain(failure_message(&output)))
        }
    }

    fn run_path(&self, helper: &str, path: &[String], value: Option<&str>) -> SessionResult<String> {
        let mut args: Vec<&str> = path.iter().map(String::as_str).collect();
        if let Some(v) = value {
            args.push(v);
        }
        self.run(helper, &args)
    }

    fn parse_json(&self, helper: &str, text: &str) -> SessionResult<Value> {
        serde_json::from_str(text).map_err(|e| {
            SessionError::Internal(format!("{helper} returned invalid JSON: {e}"))
        })
    }
}

fn failure_message(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr.trim();
    if message.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        message.to_string()
    }
}

impl ConfigSession for ShellSession {
    fn set(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        self.run_path("cfg-set", path, value).map(|_| ())
    }

    fn delete(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        self.run_path("cfg-delete", path, value).map(|_| ())
    }

    fn comment(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        self.run_path("cfg-comment", path, value).map(|_| ())
    }

    fn commit(&self) -> SessionResult<String> {
        self.run("cfg-commit", &[])
    }

    fn discard(&self) -> SessionResult<()> {
        self.run("cfg-discard", &[]).map(|_| ())
    }

    fn save(&self, file: &str) -> SessionResult<String> {
        self.run("config-save", &[file])
    }

    fn load(&self, file: &str) -> SessionResult<String> {
        self.run("config-load", &[file])
    }

    fn install_image(&self, url: &str) -> SessionResult<String> {
        self.run("image-install", &[url])
    }

    fn remove_image(&self, name: &str) -> SessionResult<String> {
        self.run("image-remove", &[name])
    }

    fn add_container_image(&self, name: &str) -> SessionResult<String> {
        self.run("container-image-add", &[name])
    }

    fn delete_container_image(&self, name: &str) -> SessionResult<String> {
        self.run("container-image-delete", &[name])
    }

    fn show_container_image(&self) -> SessionResult<String> {
        self.run("container-image-show", &[])
    }

    fn generate(&self, path: &[String]) -> SessionResult<String> {
        self.run_path("op-generate", path, None)
    }

    fn show(&self, path: &[String]) -> SessionResult<String> {
        self.run_path("op-show", path, None)
    }

    fn reset(&self, path: &[String]) -> SessionResult<String> {
        self.run_path("op-reset", path, None)
    }

    fn return_value(&self, path: &[String]) -> SessionResult<Option<String>> {
        let out = self.run_path("cfg-return-value", path, None)?;
        Ok(if out.is_empty() { None } else { Some(out) })
    }

    fn return_values(&self, path: &[String]) -> SessionResult<Vec<String>> {
        let out = self.run_path("cfg-return-values", path, None)?;
        Ok(out.lines().map(str::to_string).collect())
    }

    fn exists(&self, path: &[String]) -> SessionResult<bool> {
        let program = self.config.helper_dir.join("cfg-exists");
        let args: Vec<&str> = path.iter().map(String::as_str).collect();
        let output = Command::new(&program).args(&args).output().map_err(|e| {
            SessionError::Internal(format!("failed to run {}: {}", program.display(), e))
        })?;
        // Exit 0 means the path exists, exit 1 means it does not; anything
        // else is an engine failure.
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(SessionError::Domain(failure_message(&output))),
        }
    }

    fn show_config(&self, path: &[String]) -> SessionResult<String> {
        self.run_path("cfg-show", path, None)
    }

    fn config_to_json(&self, raw: &str) -> SessionResult<Value> {
        let out = self.run_with_stdin("config-to-json", raw)?;
        self.parse_json("config-to-json", &out)
    }

    fn config_to_json_ast(&self, raw: &str) -> SessionResult<Value> {
        let out = self.run_with_stdin("config-to-json-ast", raw)?;
        self.parse_json("config-to-json-ast", &out)
    }
}
