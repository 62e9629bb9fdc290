//! Neovim side effects built on nvim-oxi
//!
//! - `clipboard` - register-backed [`crate::picker::Clipboard`]
//! - `buffer` - scratch buffers for opening prompt content
//! - `commands` - `:PromptDeck*` user commands
//!
//! Everything here needs a running Neovim; the tests live in
//! `tests-integration/`.

pub mod buffer;
pub mod clipboard;
pub mod commands;

pub use clipboard::RegisterClipboard;
