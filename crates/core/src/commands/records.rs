//! `records.*` commands

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_args;
use crate::{
    convert,
    errors::{DeckError, Result},
    nvim, picker,
    plugin::Plugin,
};

#[derive(Debug, Deserialize)]
struct ConvertArgs {
    source: PathBuf,
    /// Defaults to the configured records directory
    #[serde(default)]
    target: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct OpenArgs {
    title: String,
    #[serde(default)]
    slug:  Option<String>,
}

/// Import a legacy JSON prompt collection
pub fn convert(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let ConvertArgs { source, target } = parse_args("records.convert", args)?;
    let target = target.unwrap_or_else(|| plugin.config().records_dir.clone());

    let report = convert::convert_legacy(&source, &target)?;
    Ok(serde_json::to_value(report)?)
}

/// Show a record's content in a scratch buffer
pub fn open_in_editor(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let OpenArgs { title, slug } = parse_args("records.open", args)?;
    let record = picker::resolve(plugin.store(), &title, slug.as_deref())
        .ok_or_else(|| DeckError::NotFound(title.clone()))?;

    let buffer = nvim::buffer::open_record(&record)?;
    Ok(json!({ "buffer": buffer }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use crate::{
        commands::{dispatch, test_support::plugin},
        errors::DeckError,
    };

    #[test]
    fn test_convert_into_records_dir() {
        let tmp = tempdir().unwrap();
        let mut plugin = plugin(&tmp);
        let source = tmp.path().join("legacy.json");
        std::fs::write(
            &source,
            r#"[{"title": "Imported", "slug": "imported", "content": "Imported content"}]"#,
        )
        .unwrap();

        let value = dispatch(
            &mut plugin,
            "records.convert",
            json!({"source": source.to_string_lossy()}),
        )
        .unwrap();

        assert_eq!(value["written"].as_array().unwrap().len(), 1);
        assert!(plugin.store().find_by_slug("imported").is_some());
    }

    #[test]
    fn test_convert_missing_source() {
        let tmp = tempdir().unwrap();
        let err = dispatch(
            &mut plugin(&tmp),
            "records.convert",
            json!({"source": "/definitely/not/here.json"}),
        )
        .unwrap_err();
        assert!(matches!(err, DeckError::ConversionError(_)));
    }

    #[test]
    fn test_open_unknown_record_fails_before_touching_neovim() {
        let tmp = tempdir().unwrap();
        let err = dispatch(&mut plugin(&tmp), "records.open", json!({"title": "Nope"})).unwrap_err();
        assert!(matches!(err, DeckError::NotFound(_)));
    }
}
