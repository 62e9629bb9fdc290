//! prompt-deck: a prompt library for Neovim
//!
//! Browse, search and copy reusable text prompts stored as one TOML file
//! each, and author new ones from a form buffer.
//!
//! ## Architecture
//!
//! - **Rust (nvim-oxi)**: record store, tag index, picker state machine,
//!   recent-selection log, form validation and persistence
//! - **Lua**: `vim.ui.select` picker, form buffer, notifications
//! - **Flat-file storage**: `*.toml` records, JSON state files
//!
//! Lua reaches everything through the `call(command, args)` export; see
//! [`commands`] for the registry.

// Module declarations
pub mod commands;
pub mod config;
pub mod conversion;
pub mod convert;
pub mod errors;
pub mod ffi;
pub mod form;
pub mod logging;
pub mod nvim;
pub mod picker;
pub mod plugin;
pub mod recent;
pub mod state;
pub mod store;
pub mod tags;

#[cfg(test)]
mod picker_test;

use nvim_oxi::{Dictionary, Function, Object};

/// Plugin entry point - called when Neovim loads the plugin
///
/// Registers the `:PromptDeck*` user commands and returns the FFI exports
/// Lua calls. The function name determines the exported symbol:
/// prompt_deck_core -> luaopen_prompt_deck_core
#[nvim_oxi::plugin]
fn prompt_deck_core() -> nvim_oxi::Result<Dictionary> {
    if let Err(err) = nvim::commands::register_user_commands() {
        tracing::warn!(error = %err, "failed to register user commands");
    }

    let mut exports = Dictionary::new();

    exports.insert(
        "call",
        Function::<(String, Object), Object>::from_fn(|(command, args): (String, Object)| {
            ffi::call(command, args)
        }),
    );
    exports.insert(
        "complete",
        Function::<(String, String), Vec<String>>::from_fn(|(kind, prefix): (String, String)| {
            ffi::complete(kind, prefix)
        }),
    );
    exports.insert("setup", Function::<Object, Object>::from_fn(ffi::setup));

    Ok(exports)
}
