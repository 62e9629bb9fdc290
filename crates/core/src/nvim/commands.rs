//! `:PromptDeck*` user commands
//!
//! Each command hands off to the Lua UI module, which drives the registry
//! through `call()`.

use nvim_oxi::api::{self, opts::CreateCommandOpts};

use crate::errors::Result;

/// `(name, lua entry point, description)`
pub const USER_COMMANDS: &[(&str, &str, &str)] = &[
    ("PromptDeck", "open_picker", "Browse and copy a prompt"),
    ("PromptDeckCreate", "open_form", "Create a custom prompt"),
    ("PromptDeckRecent", "open_recent", "Copy a recently used prompt"),
];

pub fn register_user_commands() -> Result<()> {
    for (name, entry, desc) in USER_COMMANDS {
        let opts = CreateCommandOpts::builder().desc(*desc).force(true).build();
        let command = format!("lua require('prompt_deck').{}()", entry);
        api::create_user_command(name, command.as_str(), &opts)?;
    }
    tracing::debug!(count = USER_COMMANDS.len(), "registered user commands");
    Ok(())
}
