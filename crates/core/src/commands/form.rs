//! `form.*` commands
//!
//! Tag edits take the form buffer's current draft when one is passed, so
//! unsaved title/content edits survive; otherwise the stored draft is used.
//! Either way the edited draft is persisted and returned.

use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_args;
use crate::{
    errors::Result,
    form::{FormRequest, PromptDraft},
    plugin::Plugin,
};

#[derive(Debug, Deserialize)]
struct AddTagArgs {
    tag:   String,
    #[serde(default)]
    draft: Option<PromptDraft>,
}

#[derive(Debug, Deserialize)]
struct RemoveTagArgs {
    id:    String,
    #[serde(default)]
    draft: Option<PromptDraft>,
}

/// The draft to show when the form opens
pub fn open(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    Ok(json!({ "draft": plugin.form().load_draft() }))
}

pub fn add_tag(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let AddTagArgs { tag, draft } = parse_args("form.add_tag", args)?;
    let mut draft = draft.unwrap_or_else(|| plugin.form().load_draft());

    let added = draft.add_tag(&tag).cloned();
    plugin.form_mut().save_draft(&draft)?;
    Ok(json!({ "draft": draft, "tag": added }))
}

pub fn remove_tag(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let RemoveTagArgs { id, draft } = parse_args("form.remove_tag", args)?;
    let mut draft = draft.unwrap_or_else(|| plugin.form().load_draft());

    let removed = draft.remove_tag(&id);
    plugin.form_mut().save_draft(&draft)?;
    Ok(json!({ "draft": draft, "removed": removed }))
}

/// Handle a `{ command = "submitPrompt", prompt = {...} }` message
pub fn submit(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let request: FormRequest = parse_args("form.submit", args)?;
    Ok(serde_json::to_value(plugin.submit(request))?)
}

pub fn reset(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    let draft = plugin.form_mut().reset()?;
    Ok(json!({ "draft": draft }))
}
