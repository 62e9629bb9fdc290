//! nvim_oxi::Object ↔ JSON at the Lua boundary
//!
//! Command handlers speak `serde_json::Value`; Lua speaks `Object`. Both
//! directions go through nvim-oxi's serde integration.

use nvim_oxi::{
    serde::{Deserializer, Serializer},
    Dictionary, Object,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DeckError;

/// Arguments from Lua as JSON
///
/// # Errors
/// Returns `nvim_oxi::Error::Deserialize` if the Object holds something
/// JSON can't represent (a Lua function, say)
pub fn object_to_json(obj: Object) -> nvim_oxi::Result<Value> {
    Value::deserialize(Deserializer::new(obj)).map_err(nvim_oxi::Error::Deserialize)
}

/// A command result for Lua
pub fn json_to_object(value: Value) -> nvim_oxi::Result<Object> {
    to_object(&value)
}

pub fn to_object<T: Serialize>(value: &T) -> nvim_oxi::Result<Object> {
    value
        .serialize(Serializer::new())
        .map_err(nvim_oxi::Error::Serialize)
}

/// Structured error for Lua: `{ error = true, message = ..., category = ... }`
pub fn error_object(err: &DeckError) -> Object {
    Object::from(Dictionary::from_iter([
        ("error", Object::from(true)),
        ("message", Object::from(err.user_message())),
        ("category", Object::from(err.category())),
    ]))
}
