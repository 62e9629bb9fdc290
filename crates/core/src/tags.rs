//! Tag index and tag display helpers
//!
//! The index is derived from [`RecordStore::tag_counts`] on every query and
//! never stored.
//!
//! [`RecordStore::tag_counts`]: crate::store::RecordStore::tag_counts

use std::collections::HashMap;

use serde::Serialize;

/// One tag and the number of records carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    /// Lower-cased tag
    pub tag:   String,
    pub count: usize,
}

/// Tags ordered by descending count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    entries: Vec<TagCount>,
}

impl TagIndex {
    /// Build from a count map; ties are ordered by tag name
    pub fn from_counts(counts: HashMap<String, usize>) -> Self {
        let mut entries: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Self { entries }
    }

    pub fn entries(&self) -> &[TagCount] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags starting with `prefix`, case-insensitively, in index order
    pub fn matching<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a TagCount> + 'a {
        let prefix = prefix.to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| entry.tag.starts_with(&prefix))
    }
}

/// Display form of a tag: words split on whitespace, `-` and `_`, each
/// capitalised, then joined (`code-review` → `CodeReview`)
pub fn normalize_tag(tag: &str) -> String {
    tag.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Stored form of a user-entered tag: trimmed, lower-cased, whitespace
/// runs replaced by `-`
pub fn format_tag(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Compact count label (`999`, `1.2k`)
pub fn format_count(count: usize) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}
