//! Host key/value storage
//!
//! Editors give extensions a small persistent key/value store. Neovim has
//! none, so each storage scope is one JSON object in a file under the
//! plugin's state directory. Writes replace the whole file through a temp
//! file and a rename.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::{
    errors::{DeckError, Result},
    store::write_atomic,
};

/// File holding the picker's global state (recent selections)
pub const GLOBAL_STATE_FILE: &str = "global-state.json";

/// File holding the authoring form's own state (draft)
pub const FORM_STATE_FILE: &str = "form-state.json";

/// Persistent key/value storage
#[cfg_attr(test, mockall::automock)]
pub trait StateStore: Send {
    /// Value stored under `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, persisting immediately
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// One JSON object per file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.state_error(e)),
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&text).map_err(|e| self.state_error(e))? {
            Value::Object(map) => Ok(map),
            other => Err(DeckError::StateError(format!(
                "{} holds {} instead of an object",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| self.state_error(e))?;

        let text = serde_json::to_string_pretty(map)?;
        write_atomic(&self.path, &text).map_err(|e| self.state_error(e))
    }

    fn state_error(&self, err: impl std::fmt::Display) -> DeckError {
        DeckError::StateError(format!("{}: {}", self.path.display(), err))
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        // Corrupt files are replaced rather than blocking every later write.
        let mut map = self.read_all().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable state file");
            Map::new()
        });
        map.insert(key.to_string(), value);
        self.write_all(&map)
    }
}

/// Process-local storage, used when no state directory is wanted
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
