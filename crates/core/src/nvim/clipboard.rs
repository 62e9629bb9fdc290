//! Clipboard backed by a Neovim register

use nvim_oxi::api;

use crate::{
    errors::{DeckError, Result},
    picker::Clipboard,
};

/// Writes copied text with `setreg()`
///
/// The default register is `+`, the system clipboard when a provider is
/// available.
#[derive(Debug, Clone)]
pub struct RegisterClipboard {
    register: String,
}

impl RegisterClipboard {
    pub fn new(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
        }
    }

    pub fn register(&self) -> &str {
        &self.register
    }
}

impl Clipboard for RegisterClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        // setreg() returns 0 on success
        let status: i64 = api::call_function("setreg", (self.register.as_str(), text))?;
        if status != 0 {
            return Err(DeckError::NvimError(format!(
                "setreg('{}') failed",
                self.register
            )));
        }
        tracing::debug!(register = %self.register, bytes = text.len(), "wrote register");
        Ok(())
    }
}
