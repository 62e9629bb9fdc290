//! FFI (Foreign Function Interface) layer for Lua ↔ Rust communication
//!
//! This module provides the boundary between Lua and Rust, handling:
//! - Plugin setup
//! - Command dispatch
//! - Completion candidates
//!
//! Errors never cross as Lua errors; they come back as error objects.

use nvim_oxi::Object;
use serde_json::{json, Value};

use crate::{
    commands,
    config::PluginConfig,
    conversion::{error_object, json_to_object, object_to_json},
    errors::Result,
    logging,
    nvim::RegisterClipboard,
    plugin::{self, Plugin},
    tags::TagIndex,
};

/// Called from Lua as `core.setup(opts)`
///
/// Builds a fresh [`Plugin`] from `opts` and makes it the live instance.
/// A bad table leaves any previous instance in place.
pub fn setup(opts: Object) -> nvim_oxi::Result<Object> {
    let opts = object_to_json(opts)?;
    match setup_impl(opts) {
        Ok(result) => json_to_object(result),
        Err(err) => {
            tracing::warn!(error = %err, "setup failed");
            Ok(error_object(&err))
        },
    }
}

fn setup_impl(opts: Value) -> Result<Value> {
    let config = PluginConfig::from_value(opts)?;
    logging::init(&config)?;

    let result = json!({
        "records_dir": config.records_dir,
        "state_dir": config.state_dir,
    });
    plugin::install(plugin_for(config));
    Ok(result)
}

/// Main FFI entry point for command execution
///
/// Called from Lua as: `core.call(command, args)`
///
/// # Arguments
/// * `command` - Command name in format "category.action" (e.g., "picker.open")
/// * `args` - Command arguments as a Lua table
pub fn call(command: String, args: Object) -> nvim_oxi::Result<Object> {
    let args = object_to_json(args)?;

    match dispatch_command(&command, args) {
        Ok(result) => json_to_object(result),
        Err(err) => {
            tracing::debug!(command = %command, error = %err, "command failed");
            Ok(error_object(&err))
        },
    }
}

/// Completion candidates for `kind` starting with `prefix`
///
/// Called from Lua as: `core.complete(kind, prefix)`. Kinds are `"tags"`
/// and `"titles"`; anything else yields nothing. Never fails visibly.
pub fn complete(kind: String, prefix: String) -> nvim_oxi::Result<Vec<String>> {
    match plugin::with(default_plugin, |p| complete_impl(p, &kind, &prefix)) {
        Ok(items) => Ok(items),
        Err(err) => {
            tracing::warn!(kind = %kind, error = %err, "completion failed");
            Ok(vec![])
        },
    }
}

fn dispatch_command(command: &str, args: Value) -> Result<Value> {
    plugin::with(default_plugin, |p| commands::dispatch(p, command, args))
}

fn complete_impl(plugin: &mut Plugin, kind: &str, prefix: &str) -> Result<Vec<String>> {
    let items = match kind {
        "tags" => TagIndex::from_counts(plugin.store().tag_counts())
            .matching(prefix)
            .map(|entry| entry.tag.clone())
            .collect(),
        "titles" => {
            let prefix = prefix.to_lowercase();
            plugin
                .store()
                .list_all()
                .into_iter()
                .map(|record| record.title)
                .filter(|title| title.to_lowercase().starts_with(&prefix))
                .collect()
        },
        _ => Vec::new(),
    };
    Ok(items)
}

fn plugin_for(config: PluginConfig) -> Plugin {
    let clipboard = RegisterClipboard::new(config.register.clone());
    Plugin::from_config(config, Box::new(clipboard))
}

/// Instance used when a command arrives before `setup()`
fn default_plugin() -> Plugin {
    tracing::info!("no setup() call yet, using default configuration");
    plugin_for(PluginConfig::default())
}
