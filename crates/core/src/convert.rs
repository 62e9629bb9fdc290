//! Legacy prompt import
//!
//! Older prompt collections shipped as JSON arrays of objects, one prompt
//! per element. [`convert_legacy`] turns each element into a record file in
//! the target directory, named `<slug>.toml`, or `rule-<n>.toml` (1-based
//! position in its array) when the element has no slug.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    errors::{DeckError, Result},
    store::{is_safe_slug, record::default_version, slugify, write_atomic, Author, PromptRecord},
};

const LEGACY_EXTENSION: &str = "json";

/// What one conversion run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    pub written: Vec<PathBuf>,
    /// `(source file, 1-based element index, reason)`
    pub skipped: Vec<(PathBuf, usize, String)>,
    /// Source files that could not be read as a JSON array at all
    pub failed:  Vec<(PathBuf, String)>,
}

#[derive(Debug, Deserialize)]
struct LegacyPrompt {
    #[serde(default)]
    author:      Option<Author>,
    #[serde(default)]
    title:       String,
    #[serde(default)]
    version:     Option<String>,
    #[serde(default)]
    tags:        Vec<String>,
    #[serde(default)]
    content:     String,
    #[serde(default)]
    notes:       Option<String>,
    #[serde(default)]
    slug:        Option<String>,
    #[serde(default)]
    libs:        Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category:    Option<String>,
    #[serde(default)]
    framework:   Option<String>,
    #[serde(flatten)]
    extra:       Map<String, Value>,
}

impl LegacyPrompt {
    fn into_record(self) -> std::result::Result<PromptRecord, String> {
        if self.title.trim().is_empty() {
            return Err("missing title".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("missing content".to_string());
        }
        if !self.extra.is_empty() {
            let keys: Vec<_> = self.extra.keys().map(String::as_str).collect();
            debug!(title = %self.title, ?keys, "dropping unknown legacy keys");
        }

        let mut record = PromptRecord::new(self.title, self.content).with_tags(self.tags);
        record.version = self
            .version
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_version);
        record.slug = self.slug.filter(|s| !s.trim().is_empty());
        record.author = self.author;
        record.notes = self.notes;
        record.libs = self.libs;
        record.description = self.description;
        record.category = self.category;
        record.framework = self.framework;
        Ok(record)
    }
}

/// Convert a legacy file, or every `*.json` file in a directory
///
/// Bad elements and unreadable files are reported and skipped; the run
/// fails only when `source` doesn't exist or `target_dir` can't be
/// created.
pub fn convert_legacy(source: &Path, target_dir: &Path) -> Result<ConversionReport> {
    if !source.exists() {
        return Err(DeckError::ConversionError(format!(
            "source {} does not exist",
            source.display()
        )));
    }
    std::fs::create_dir_all(target_dir).map_err(|e| {
        DeckError::ConversionError(format!("creating {}: {}", target_dir.display(), e))
    })?;

    let mut report = ConversionReport::default();
    let mut stems = HashSet::new();
    for file in legacy_files(source) {
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "cannot read legacy file");
                report.failed.push((file, e.to_string()));
                continue;
            },
        };
        if let Err(reason) = convert_text(&text, &file, target_dir, &mut stems, &mut report) {
            warn!(file = %file.display(), %reason, "cannot convert legacy file");
            report.failed.push((file, reason));
        }
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "legacy conversion finished"
    );
    Ok(report)
}

fn legacy_files(source: &Path) -> Vec<PathBuf> {
    if source.is_file() {
        return vec![source.to_path_buf()];
    }
    WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == LEGACY_EXTENSION))
        .collect()
}

fn convert_text(
    text: &str,
    file: &Path,
    target_dir: &Path,
    stems: &mut HashSet<String>,
    report: &mut ConversionReport,
) -> std::result::Result<(), String> {
    let elements: Vec<Value> = serde_json::from_str(text).map_err(|e| e.to_string())?;

    for (i, element) in elements.into_iter().enumerate() {
        let n = i + 1;
        let record = serde_json::from_value::<LegacyPrompt>(element)
            .map_err(|e| e.to_string())
            .and_then(LegacyPrompt::into_record);

        let mut record = match record {
            Ok(record) => record,
            Err(reason) => {
                warn!(file = %file.display(), element = n, %reason, "skipping legacy prompt");
                report.skipped.push((file.to_path_buf(), n, reason));
                continue;
            },
        };

        let stem = match record.slug.take() {
            Some(slug) if is_safe_slug(&slug) => {
                record.slug = Some(slug.clone());
                slug
            },
            Some(slug) => {
                let cleaned = slugify(&slug);
                debug!(%slug, %cleaned, "replacing unsafe legacy slug");
                if cleaned.is_empty() {
                    format!("rule-{}", n)
                } else {
                    record.slug = Some(cleaned.clone());
                    cleaned
                }
            },
            None => format!("rule-{}", n),
        };
        if !stems.insert(stem.clone()) {
            let reason = format!("duplicate slug {}", stem);
            warn!(file = %file.display(), element = n, %reason, "skipping legacy prompt");
            report.skipped.push((file.to_path_buf(), n, reason));
            continue;
        }
        let target = target_dir.join(format!("{}.toml", stem));

        let written = record
            .to_toml()
            .and_then(|toml| write_atomic(&target, &toml).map_err(|e| e.to_string()));
        match written {
            Ok(()) => report.written.push(target),
            Err(reason) => {
                warn!(target = %target.display(), %reason, "cannot write record");
                report.skipped.push((file.to_path_buf(), n, reason));
            },
        }
    }
    Ok(())
}
