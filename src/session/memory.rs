//! # In-Memory Session
//!
//! A self-contained [`ConfigSession`] implementation backed by an in-memory
//! path store. In production the gateway talks to the real engine through
//! [`super::shell::ShellSession`]; this one exists for tests and local
//! development, and records the mutating calls it receives so tests can
//! assert on exact call sequences.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Map, Value};

use super::engine::{ConfigSession, SessionError, SessionResult};

#[derive(Debug, Default)]
struct Inner {
    /// Committed configuration: full paths (value appended as last element)
    active: Vec<Vec<String>>,
    /// Uncommitted edits staged by set/delete since the last commit
    pending: Vec<PendingEdit>,
    /// Mutating calls observed, in order
    calls: Vec<String>,
    fail_next_commit: Option<String>,
    fail_set_on: HashMap<String, String>,
    apply_delay: Duration,
}

#[derive(Debug, Clone)]
enum PendingEdit {
    Insert(Vec<String>),
    Remove(Vec<String>),
}

/// In-memory engine stand-in
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: Mutex<Inner>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the active configuration with a committed full path
    pub fn seed(&self, path: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.active.push(path.iter().map(|s| s.to_string()).collect());
    }

    /// Mutating calls observed so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Make the next commit fail with a domain error
    pub fn fail_next_commit(&self, message: &str) {
        self.inner.lock().unwrap().fail_next_commit = Some(message.to_string());
    }

    /// Make `set` fail with a domain error whenever the path starts with
    /// the given segment
    pub fn fail_set_on(&self, first_segment: &str, message: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_set_on
            .insert(first_segment.to_string(), message.to_string());
    }

    /// Slow down every staged edit, to widen race windows in tests
    pub fn set_apply_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().apply_delay = delay;
    }

    fn full_path(path: &[String], value: Option<&str>) -> Vec<String> {
        let mut full: Vec<String> = path.to_vec();
        if let Some(v) = value {
            full.push(v.to_string());
        }
        full
    }

    fn record(&self, verb: &str, full: &[String]) {
        let mut line = verb.to_string();
        for segment in full {
            line.push(' ');
            line.push_str(segment);
        }
        self.inner.lock().unwrap().calls.push(line);
    }

    fn delay(&self) {
        let delay = self.inner.lock().unwrap().apply_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

impl ConfigSession for MemorySession {
    fn set(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        let full = Self::full_path(path, value);
        self.record("set", &full);
        self.delay();
        let mut inner = self.inner.lock().unwrap();
        if let Some(first) = path.first() {
            if let Some(message) = inner.fail_set_on.get(first) {
                return Err(SessionError::Domain(message.clone()));
            }
        }
        inner.pending.push(PendingEdit::Insert(full));
        Ok(())
    }

    fn delete(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        let full = Self::full_path(path, value);
        self.record("delete", &full);
        self.delay();
        self.inner
            .lock()
            .unwrap()
            .pending
            .push(PendingEdit::Remove(full));
        Ok(())
    }

    fn comment(&self, path: &[String], value: Option<&str>) -> SessionResult<()> {
        let full = Self::full_path(path, value);
        self.record("comment", &full);
        Ok(())
    }

    fn commit(&self) -> SessionResult<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("commit".to_string());
        if let Some(message) = inner.fail_next_commit.take() {
            return Err(SessionError::Domain(message));
        }
        let edits = std::mem::take(&mut inner.pending);
        for edit in edits {
            match edit {
                PendingEdit::Insert(full) => inner.active.push(full),
                PendingEdit::Remove(full) => {
                    inner.active.retain(|entry| !entry.starts_with(&full));
                }
            }
        }
        Ok(String::new())
    }

    fn discard(&self) -> SessionResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("discard".to_string());
        inner.pending.clear();
        Ok(())
    }

    fn save(&self, file: &str) -> SessionResult<String> {
        self.inner.lock().unwrap().calls.push(format!("save {file}"));
        Ok(format!("Saving configuration to '{file}'"))
    }

    fn load(&self, file: &str) -> SessionResult<String> {
        self.inner.lock().unwrap().calls.push(format!("load {file}"));
        Ok(format!("Loading configuration from '{file}'"))
    }

    fn install_image(&self, url: &str) -> SessionResult<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(format!("install-image {url}"));
        Ok(format!("Installing image from '{url}'"))
    }

    fn remove_image(&self, name: &str) -> SessionResult<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(format!("remove-image {name}"));
        Ok(format!("Removing image '{name}'"))
    }

    fn add_container_image(&self, name: &str) -> SessionResult<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(format!("add-container-image {name}"));
        Ok(format!("Pulling container image '{name}'"))
    }

    fn delete_container_image(&self, name: &str) -> SessionResult<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(format!("delete-container-image {name}"));
        Ok(format!("Removing container image '{name}'"))
    }

    fn show_container_image(&self) -> SessionResult<String> {
        Ok("REPOSITORY  TAG  IMAGE ID".to_string())
    }

    fn generate(&self, path: &[String]) -> SessionResult<String> {
        self.record("generate", path);
        Ok(format!("generated {}", path.join(" ")))
    }

    fn show(&self, path: &[String]) -> SessionResult<String> {
        Ok(format!("show {}", path.join(" ")))
    }

    fn reset(&self, path: &[String]) -> SessionResult<String> {
        self.record("reset", path);
        Ok(String::new())
    }

    fn return_value(&self, path: &[String]) -> SessionResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .active
            .iter()
            .find(|entry| entry.len() == path.len() + 1 && entry.starts_with(path))
            .map(|entry| entry[path.len()].clone()))
    }

    fn return_values(&self, path: &[String]) -> SessionResult<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .active
            .iter()
            .filter(|entry| entry.len() == path.len() + 1 && entry.starts_with(path))
            .map(|entry| entry[path.len()].clone())
            .collect())
    }

    fn exists(&self, path: &[String]) -> SessionResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.active.iter().any(|entry| entry.starts_with(path)))
    }

    fn show_config(&self, path: &[String]) -> SessionResult<String> {
        let inner = self.inner.lock().unwrap();
        let lines: Vec<String> = inner
            .active
            .iter()
            .filter(|entry| entry.starts_with(path))
            .map(|entry| entry.join(" "))
            .collect();
        Ok(lines.join("\n"))
    }

    fn config_to_json(&self, raw: &str) -> SessionResult<Value> {
        let mut root = Map::new();
        for line in raw.lines().filter(|l| !l.is_empty()) {
            let mut node = &mut root;
            for segment in line.split_whitespace() {
                node = node
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()))
                    .as_object_mut()
                    .ok_or_else(|| {
                        SessionError::Domain("Failed to parse config: conflicting paths".into())
                    })?;
            }
        }
        Ok(Value::Object(root))
    }

    fn config_to_json_ast(&self, raw: &str) -> SessionResult<Value> {
        let lines: Vec<&str> = raw.lines().filter(|l| !l.is_empty()).collect();
        Ok(json!({ "children": lines }))
    }
}
