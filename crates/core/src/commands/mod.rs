//! Command registry and dispatch system
//!
//! Commands are registered as "category.action" (e.g. "picker.open",
//! "form.submit") and dispatched to handler functions with JSON arguments.
//! Lua reaches them through `ffi.call(command, args)`.
//!
//! ## Adding a new command
//!
//! 1. Create handler function: `pub fn my_command(plugin: &mut Plugin, args: Value) -> Result<Value>`
//! 2. Register in `REGISTRY`: `("category.action", my_command as CommandHandler)`
//! 3. Add tests for the command

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    errors::{DeckError, Result},
    plugin::Plugin,
};

pub mod form;
pub mod picker;
pub mod recent;
pub mod records;

/// All command handlers take the plugin services and JSON arguments
pub type CommandHandler = fn(&mut Plugin, Value) -> Result<Value>;

/// Static command registry
static REGISTRY: Lazy<HashMap<&'static str, CommandHandler>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("ping", ping as CommandHandler);
    map.insert("commands.list", commands_list as CommandHandler);

    map.insert("picker.open", picker::open as CommandHandler);
    map.insert("picker.tag", picker::tag as CommandHandler);
    map.insert("picker.back", picker::back as CommandHandler);
    map.insert("picker.choose", picker::choose as CommandHandler);
    map.insert("picker.create", picker::create as CommandHandler);

    map.insert("recent.list", recent::list as CommandHandler);
    map.insert("recent.copy", recent::copy as CommandHandler);

    map.insert("form.open", form::open as CommandHandler);
    map.insert("form.add_tag", form::add_tag as CommandHandler);
    map.insert("form.remove_tag", form::remove_tag as CommandHandler);
    map.insert("form.submit", form::submit as CommandHandler);
    map.insert("form.reset", form::reset as CommandHandler);

    map.insert("records.convert", records::convert as CommandHandler);
    map.insert("records.open", records::open_in_editor as CommandHandler);

    map
});

/// Dispatch a command by name
pub fn dispatch(plugin: &mut Plugin, command: &str, args: Value) -> Result<Value> {
    match REGISTRY.get(command) {
        Some(handler) => {
            tracing::debug!(command, "dispatching command");
            handler(plugin, args)
        },
        None => Err(DeckError::CommandNotFound(command.to_string())),
    }
}

/// Sorted list of all registered command names
pub fn list_commands() -> Vec<String> {
    let mut commands: Vec<String> = REGISTRY.keys().map(|&k| k.to_string()).collect();
    commands.sort();
    commands
}

/// Deserialize handler arguments, treating `null` as an empty table
pub(crate) fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T> {
    let args = match args {
        Value::Null => json!({}),
        // Lua's empty table arrives as an empty array
        Value::Array(ref items) if items.is_empty() => json!({}),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| DeckError::invalid_args(command, e.to_string()))
}

// ============================================================================
// Utility Commands
// ============================================================================

/// Echo the arguments back with `"pong": true`
fn ping(_plugin: &mut Plugin, args: Value) -> Result<Value> {
    let mut result = match args {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    result.insert("pong".to_string(), Value::Bool(true));
    Ok(Value::Object(result))
}

fn commands_list(_plugin: &mut Plugin, _args: Value) -> Result<Value> {
    Ok(json!({ "commands": list_commands() }))
}
