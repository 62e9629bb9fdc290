//! Authoring form model
//!
//! The form surface (a Lua scratch buffer) keeps its in-progress draft in
//! its own storage scope and talks to the store only through
//! [`FormRequest`] / [`FormResponse`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    errors::{DeckError, Result},
    state::StateStore,
    store::{record::default_version, PromptRecord, RecordStore},
    tags::format_tag,
};

/// Storage key holding the draft in the form's own scope
pub const DRAFT_KEY: &str = "prompt";

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_CONTENT_CHARS: usize = 10;

/// A tag as edited in the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub id:   String,
    pub text: String,
}

/// In-progress, unsaved state of the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptDraft {
    pub title:      String,
    pub version:    String,
    #[serde(deserialize_with = "de_tags")]
    pub tags:       Vec<TagEntry>,
    pub content:    String,
    pub notes:      String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PromptDraft {
    fn default() -> Self {
        Self {
            title:      String::new(),
            version:    default_version(),
            tags:       Vec::new(),
            content:    String::new(),
            notes:      String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl PromptDraft {
    /// Append a tag typed by the user
    ///
    /// The text is normalised with [`format_tag`]; input that normalises to
    /// nothing is ignored.
    pub fn add_tag(&mut self, raw: &str) -> Option<&TagEntry> {
        let text = format_tag(raw);
        if text.is_empty() {
            return None;
        }
        self.tags.push(TagEntry {
            id: uuid::Uuid::new_v4().to_string(),
            text,
        });
        self.tags.last()
    }

    /// Drop the tag with `id`; returns whether one was removed
    pub fn remove_tag(&mut self, id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|tag| tag.id != id);
        self.tags.len() != before
    }

    /// Record built from this draft; blank version falls back to the default
    pub fn to_record(&self) -> PromptRecord {
        let mut record = PromptRecord::new(self.title.trim(), self.content.clone())
            .with_tags(self.tags.iter().map(|t| t.text.clone()));
        let version = self.version.trim();
        if !version.is_empty() {
            record.version = version.to_string();
        }
        let notes = self.notes.trim();
        if !notes.is_empty() {
            record.notes = Some(self.notes.clone());
        }
        record.created_at = self.created_at;
        record
    }
}

// An empty Lua table can arrive as `{}` rather than `[]`.
fn de_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<TagEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<TagEntry>),
        Empty(serde_json::Map<String, serde_json::Value>),
    }

    match Tags::deserialize(deserializer)? {
        Tags::List(tags) => Ok(tags),
        Tags::Empty(map) if map.is_empty() => Ok(Vec::new()),
        Tags::Empty(_) => Err(serde::de::Error::custom("tags must be a list")),
    }
}

/// Field constraints on a draft; every failure is reported
///
/// Lengths are measured after trimming, matching what gets stored.
pub fn validate(draft: &PromptDraft) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if draft.title.trim().chars().count() < MIN_TITLE_CHARS {
        errors.push(format!(
            "Title must be at least {} characters",
            MIN_TITLE_CHARS
        ));
    }
    if draft.content.trim().chars().count() < MIN_CONTENT_CHARS {
        errors.push(format!(
            "Prompt content must be at least {} characters",
            MIN_CONTENT_CHARS
        ));
    }
    if draft.tags.iter().any(|tag| tag.text.is_empty()) {
        errors.push("Tag cannot be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Message from the form surface to its host
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum FormRequest {
    SubmitPrompt { prompt: PromptDraft },
}

/// Reply from the host to the form surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormResponse {
    Saved {
        title: String,
        slug:  String,
        path:  PathBuf,
    },
    Invalid {
        errors: Vec<String>,
    },
    SaveFailed {
        message: String,
    },
}

/// Draft persistence plus the submit path
pub struct AuthoringForm {
    storage: Box<dyn StateStore>,
}

impl AuthoringForm {
    pub fn new(storage: Box<dyn StateStore>) -> Self {
        Self { storage }
    }

    /// Last persisted draft, or an empty one
    pub fn load_draft(&self) -> PromptDraft {
        match self.storage.get(DRAFT_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring malformed draft");
                PromptDraft::default()
            }),
            Ok(None) => PromptDraft::default(),
            Err(err) => {
                warn!(error = %err, "failed to read draft");
                PromptDraft::default()
            },
        }
    }

    /// Persist `draft`; the latest call wins
    pub fn save_draft(&mut self, draft: &PromptDraft) -> Result<()> {
        self.storage.set(DRAFT_KEY, serde_json::to_value(draft)?)
    }

    /// Replace the stored draft with an empty one
    pub fn reset(&mut self) -> Result<PromptDraft> {
        let draft = PromptDraft::default();
        self.save_draft(&draft)?;
        Ok(draft)
    }

    /// Handle a message from the form surface
    ///
    /// The draft is persisted before validation, whatever the outcome, so a
    /// reopened form shows what the user last submitted.
    pub fn handle(&mut self, request: FormRequest, store: &RecordStore) -> FormResponse {
        match request {
            FormRequest::SubmitPrompt { prompt } => self.submit(prompt, store),
        }
    }

    fn submit(&mut self, draft: PromptDraft, store: &RecordStore) -> FormResponse {
        if let Err(err) = self.save_draft(&draft) {
            warn!(error = %err, "failed to persist draft");
        }

        if let Err(errors) = validate(&draft) {
            return FormResponse::Invalid { errors };
        }

        let mut record = draft.to_record();
        match store.save(&mut record) {
            Ok(path) => {
                info!(title = %record.title, path = %path.display(), "prompt saved");
                FormResponse::Saved {
                    title: record.title,
                    slug: record.slug.unwrap_or_default(),
                    path,
                }
            },
            Err(err) => {
                warn!(error = %err, "prompt save failed");
                let message = match &err {
                    DeckError::SaveError { .. } => err.user_message(),
                    other => format!("Failed to save prompt: {}", other),
                };
                FormResponse::SaveFailed { message }
            },
        }
    }
}
