//! Tests that need a running Neovim
//!
//! Each `#[nvim_oxi::test]` runs inside a headless Neovim instance.

#[cfg(test)]
mod buffer;
#[cfg(test)]
mod clipboard;
#[cfg(test)]
mod commands;
