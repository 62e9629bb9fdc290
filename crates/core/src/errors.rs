//! Error types for prompt-deck
//!
//! This module defines error types that bridge Rust and Lua, ensuring
//! error messages are user-friendly across the FFI boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for prompt-deck operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// Main error type for prompt-deck
#[derive(Debug, Error)]
pub enum DeckError {
    /// Command not found in registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// A record file could not be parsed
    #[error("Failed to parse record {}: {reason}", path.display())]
    ParseError { path: PathBuf, reason: String },

    /// A draft failed field validation
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// A record could not be written
    #[error("Failed to save prompt '{title}': {reason}")]
    SaveError { title: String, reason: String },

    /// Key/value state could not be read or written
    #[error("State storage error: {0}")]
    StateError(String),

    /// No record matches the requested title or slug
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// The picker session was closed by a previous action
    #[error("Picker is closed")]
    PickerClosed,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Conversion error (nvim-oxi Object ↔ Rust types)
    #[error("Conversion error: {0}")]
    ConversionError(String),

    /// Neovim API error
    #[error("Neovim error: {0}")]
    NvimError(String),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::Other(err.to_string())
    }
}

impl From<nvim_oxi::api::Error> for DeckError {
    fn from(err: nvim_oxi::api::Error) -> Self {
        DeckError::NvimError(err.to_string())
    }
}

impl From<String> for DeckError {
    fn from(err: String) -> Self {
        DeckError::Other(err)
    }
}

impl From<&str> for DeckError {
    fn from(err: &str) -> Self {
        DeckError::Other(err.to_string())
    }
}

/// Convert DeckError to a Lua-friendly error message
impl DeckError {
    /// Get user-friendly error message for display in Neovim
    pub fn user_message(&self) -> String {
        match self {
            DeckError::CommandNotFound(cmd) => {
                format!(
                    "Command '{}' not found. Run :PromptDeck to open the picker.",
                    cmd
                )
            },
            DeckError::InvalidArgs { command, reason } => {
                format!("Invalid arguments for '{}': {}", command, reason)
            },
            DeckError::ValidationError(messages) => messages.join("\n"),
            DeckError::SaveError { reason, .. } => {
                format!("Failed to save prompt: {}", reason)
            },
            DeckError::NotFound(key) => format!("No prompt named '{}'", key),
            _ => self.to_string(),
        }
    }

    /// Get error category for logging and Lua-side handling
    pub fn category(&self) -> &'static str {
        match self {
            DeckError::CommandNotFound(_) => "command",
            DeckError::InvalidArgs { .. } => "arguments",
            DeckError::ParseError { .. } => "parse",
            DeckError::ValidationError(_) => "validation",
            DeckError::SaveError { .. } => "save",
            DeckError::StateError(_) => "state",
            DeckError::NotFound(_) => "not_found",
            DeckError::PickerClosed => "picker",
            DeckError::SerdeError(_) => "serialization",
            DeckError::IoError(_) => "io",
            DeckError::ConfigError(_) => "config",
            DeckError::ConversionError(_) => "conversion",
            DeckError::NvimError(_) => "nvim",
            DeckError::Other(_) => "other",
        }
    }

    /// Shorthand for argument errors raised by command handlers
    pub fn invalid_args(command: &str, reason: impl Into<String>) -> Self {
        DeckError::InvalidArgs {
            command: command.to_string(),
            reason:  reason.into(),
        }
    }
}
