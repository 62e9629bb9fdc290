//! Flat-file prompt store
//!
//! Every read scans the records directory and re-parses each `*.toml`
//! file. Nothing is cached, so the files are the only source of truth.
//! Files that fail to parse are logged and skipped.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{DeckError, Result};

pub mod record;
#[cfg(test)]
mod store_test;

pub use record::{Author, PromptRecord, DEFAULT_VERSION};

const RECORD_EXTENSION: &str = "toml";

/// Directory-backed record store
///
/// Constructed explicitly and handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every valid record, in file-name order
    pub fn list_all(&self) -> Vec<PromptRecord> {
        self.scan().collect()
    }

    /// Records carrying `tag`, compared case-insensitively
    pub fn list_by_tag(&self, tag: &str) -> Vec<PromptRecord> {
        self.scan().filter(|r| r.has_tag(tag)).collect()
    }

    /// First record whose title matches exactly
    pub fn find_by_title(&self, title: &str) -> Option<PromptRecord> {
        self.scan().find(|r| r.title == title)
    }

    /// Record stored as `<slug>.toml`, or declaring that slug
    pub fn find_by_slug(&self, slug: &str) -> Option<PromptRecord> {
        let direct = self.record_path(slug);
        if is_safe_slug(slug) && direct.is_file() {
            if let Some(record) = self.load(&direct) {
                return Some(record);
            }
        }
        self.scan().find(|r| r.slug.as_deref() == Some(slug))
    }

    /// Lower-cased tag → number of records carrying it
    pub fn tag_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for record in self.scan() {
            for tag in &record.tags {
                *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Write a record to `<slug>.toml`, replacing any previous version
    ///
    /// Records without a slug get one derived from the title that doesn't
    /// collide with an existing file. Timestamps are stamped here. The
    /// write goes through a temp file in the same directory and a rename.
    pub fn save(&self, record: &mut PromptRecord) -> Result<PathBuf> {
        let title = record.title.clone();
        let save_error = |reason: String| DeckError::SaveError {
            title: title.clone(),
            reason,
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| save_error(e.to_string()))?;

        let slug = match record.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(slug) if is_safe_slug(slug) => slug.to_string(),
            Some(slug) => match slugify(slug) {
                cleaned if cleaned.is_empty() => self.unique_slug(&record.title),
                cleaned => {
                    warn!(slug, %cleaned, "replacing unsafe slug");
                    cleaned
                },
            },
            None => self.unique_slug(&record.title),
        };

        let now = Utc::now();
        record.slug = Some(slug.clone());
        record.created_at.get_or_insert(now);
        record.updated_at = Some(now);

        let text = record.to_toml().map_err(&save_error)?;
        let target = self.record_path(&slug);

        write_atomic(&target, &text).map_err(|e| save_error(e.to_string()))?;

        debug!(path = %target.display(), "saved prompt record");
        Ok(target)
    }

    fn record_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, RECORD_EXTENSION))
    }

    fn unique_slug(&self, title: &str) -> String {
        let base = slugify(title);
        let base = if base.is_empty() {
            format!("prompt-{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
        } else {
            base
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while self.record_path(&candidate).exists() {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        candidate
    }

    fn record_files(&self) -> Vec<PathBuf> {
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "records directory does not exist");
            return Vec::new();
        }

        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    None
                },
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == RECORD_EXTENSION))
            .collect()
    }

    fn scan(&self) -> impl Iterator<Item = PromptRecord> + '_ {
        self.record_files()
            .into_iter()
            .filter_map(move |path| self.load(&path))
    }

    fn load(&self, path: &Path) -> Option<PromptRecord> {
        match parse_file(path) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "skipping record file");
                None
            },
        }
    }
}

fn parse_file(path: &Path) -> Result<PromptRecord> {
    let parse_error = |reason: String| DeckError::ParseError {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    PromptRecord::from_toml(&text, &stem).map_err(parse_error)
}

/// Replace `target` with `text` through a temp file in the same directory
pub(crate) fn write_atomic(target: &Path, text: &str) -> std::io::Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Whether `slug` can be used as a file stem inside the records directory
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains("..")
        && !slug.contains(&['/', '\\', '\0'][..])
}

/// File-name-safe form of a title: lower-case ASCII alphanumerics
/// separated by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
