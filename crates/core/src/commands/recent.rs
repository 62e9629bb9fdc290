//! `recent.*` commands

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::parse_args;
use crate::{errors::Result, picker, plugin::Plugin};

#[derive(Debug, Serialize)]
struct RecentItem {
    title:     String,
    slug:      Option<String>,
    timestamp: i64,
    /// Local date and time of the pick
    when:      String,
    /// Whether the record still exists
    available: bool,
}

#[derive(Debug, Deserialize)]
struct CopyArgs {
    title: String,
    #[serde(default)]
    slug:  Option<String>,
}

/// Every logged pick, most recent first
pub fn list(plugin: &mut Plugin, _args: Value) -> Result<Value> {
    let items: Vec<RecentItem> = plugin
        .recent()
        .list()
        .into_iter()
        .map(|entry| RecentItem {
            available: picker::resolve(plugin.store(), &entry.title, entry.slug.as_deref())
                .is_some(),
            when: format_local(entry.timestamp),
            title: entry.title,
            slug: entry.slug,
            timestamp: entry.timestamp,
        })
        .collect();
    Ok(json!({ "items": items }))
}

/// Copy a logged pick again; the log order is left alone
pub fn copy(plugin: &mut Plugin, args: Value) -> Result<Value> {
    let CopyArgs { title, slug } = parse_args("recent.copy", args)?;
    let record = plugin.copy_recent(&title, slug.as_deref())?;
    Ok(json!({
        "title": record.title,
        "content": record.content,
    }))
}

fn format_local(timestamp: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
