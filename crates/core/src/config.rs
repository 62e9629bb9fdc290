//! Plugin configuration
//!
//! Built from the table Lua passes to `require('prompt_deck').setup({...})`.
//! Every field has a default, so an empty table is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{DeckError, Result},
    picker::DEFAULT_RECENT_SHOWN,
    recent::MAX_RECENT,
};

const APP_DIR: &str = "prompt-deck";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Directory of `*.toml` prompt records
    pub records_dir:  PathBuf,
    /// Directory for state files and logs
    pub state_dir:    PathBuf,
    pub recent_limit: usize,
    /// Recent picks shown on the picker's main view
    pub recent_shown: usize,
    /// Default `tracing` filter, overridden by `PROMPT_DECK_LOG`
    pub log_level:    String,
    /// Register written on copy
    pub register:     String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            records_dir:  base.join("prompts"),
            state_dir:    base,
            recent_limit: MAX_RECENT,
            recent_shown: DEFAULT_RECENT_SHOWN,
            log_level:    "info".to_string(),
            register:     "+".to_string(),
        }
    }
}

impl PluginConfig {
    /// Parse a `setup()` table
    ///
    /// `null` means all defaults. Unknown keys and out-of-range values are
    /// rejected. Leading `~` in paths is expanded.
    pub fn from_value(value: Value) -> Result<Self> {
        let config: PluginConfig = match value {
            Value::Null => PluginConfig::default(),
            Value::Object(ref map) if map.is_empty() => PluginConfig::default(),
            // Lua's empty table arrives as an empty array
            Value::Array(ref items) if items.is_empty() => PluginConfig::default(),
            other => serde_json::from_value(other)
                .map_err(|e| DeckError::ConfigError(e.to_string()))?,
        };
        config.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if !(1..=MAX_RECENT).contains(&self.recent_limit) {
            return Err(DeckError::ConfigError(format!(
                "recent_limit must be between 1 and {}, got {}",
                MAX_RECENT, self.recent_limit
            )));
        }
        if self.register.chars().count() != 1 {
            return Err(DeckError::ConfigError(format!(
                "register must be a single character, got '{}'",
                self.register
            )));
        }
        self.records_dir = expand_home(&self.records_dir);
        self.state_dir = expand_home(&self.state_dir);
        Ok(self)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
