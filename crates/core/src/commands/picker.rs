//! `picker.*` commands
//!
//! Each returns the serialized [`PickerOutcome`] (or the opening
//! [`PickerScreen`]) for the Lua picker to render.

use serde::Deserialize;
use serde_json::Value;

use super::parse_args;
use crate::{
    errors::Result,
    picker::{PickerAction, PickerOutcome},
    plugin::Plugin,
};

#[derive(Debug, Deserialize)]
struct TagArgs {
    tag: String,
}

#[derive(Debug, Deserialize)]
struct ChooseArgs {
    title: String,
    #[serde(default)]
    slug:  Option<String>,
}

pub fn open(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    let screen = plugin.open_picker();
    Ok(serde_json::to_value(PickerOutcome::Show(screen))?)
}

pub fn tag(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let TagArgs { tag } = parse_args("picker.tag", args)?;
    act(plugin, PickerAction::ChooseTag { tag })
}

pub fn back(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    act(plugin, PickerAction::Back)
}

pub fn choose(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let ChooseArgs { title, slug } = parse_args("picker.choose", args)?;
    act(plugin, PickerAction::ChooseRecord { title, slug })
}

pub fn create(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    act(plugin, PickerAction::CreateNew)
}

fn act(plugin: &mut Plugin, action: PickerAction) -> Result<Value> {
    let outcome = plugin.picker_action(action)?;
    Ok(serde_json::to_value(outcome)?)
}
