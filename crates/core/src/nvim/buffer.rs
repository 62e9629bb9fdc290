//! Scratch buffers
//!
//! "Open in Editor" puts a prompt's content into an unlisted markdown
//! buffer the user can edit or yank from.

use nvim_oxi::api::{self, opts::OptionOpts};

use crate::{errors::Result, store::PromptRecord};

/// Buffer variable holding the prompt title
pub const TITLE_VAR: &str = "prompt_deck_title";

/// Open `record` in a new scratch buffer in the current window
///
/// Returns the buffer handle.
pub fn open_record(record: &PromptRecord) -> Result<i32> {
    let mut buf = api::create_buf(false, true)?;
    buf.set_lines(.., false, record.content.lines())?;

    let opts = OptionOpts::builder().buffer(buf.clone()).build();
    api::set_option_value("filetype", "markdown", &opts)?;
    api::set_option_value("bufhidden", "wipe", &opts)?;
    buf.set_var(TITLE_VAR, record.title.as_str())?;

    api::set_current_buf(&buf)?;
    tracing::debug!(title = %record.title, buf = buf.handle(), "opened prompt buffer");
    Ok(buf.handle())
}

// Tests for this module are in tests-integration/src/
// since they require a running Neovim instance
