//! Prompt record model and its TOML file format
//!
//! A record file has an optional `[author]` table followed by a `[prompt]`
//! table. Keys inside `[prompt]` are written in a fixed order:
//! `title, version, tags, content, notes, slug, libs, description,
//! category, framework`, then the timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Version assigned to records that don't declare one
pub const DEFAULT_VERSION: &str = "0.1.0";

pub(crate) fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Optional author metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url:   Option<String>,
}

/// A stored prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub title:       String,
    pub content:     String,
    pub version:     String,
    pub tags:        Vec<String>,
    /// Stable identifier; also the file stem of `<slug>.toml`
    pub slug:        Option<String>,
    pub author:      Option<Author>,
    pub notes:       Option<String>,
    pub libs:        Vec<String>,
    pub description: Option<String>,
    pub category:    Option<String>,
    pub framework:   Option<String>,
    pub created_at:  Option<DateTime<Utc>>,
    pub updated_at:  Option<DateTime<Utc>>,
}

impl PromptRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title:       title.into(),
            content:     content.into(),
            version:     default_version(),
            tags:        Vec::new(),
            slug:        None,
            author:      None,
            notes:       None,
            libs:        Vec::new(),
            description: None,
            category:    None,
            framework:   None,
            created_at:  None,
            updated_at:  None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }

    /// Parse a record file
    ///
    /// `file_stem` supplies the slug when the file doesn't declare one.
    /// Returns a plain reason string on failure; the store wraps it with
    /// the file path.
    pub fn from_toml(text: &str, file_stem: &str) -> std::result::Result<Self, String> {
        let file: RecordFile = toml::from_str(text).map_err(|e| e.to_string())?;
        let prompt = file.prompt;

        if prompt.title.trim().is_empty() {
            return Err("missing `title` in [prompt]".to_string());
        }
        if prompt.content.trim().is_empty() {
            return Err("missing `content` in [prompt]".to_string());
        }

        let slug = prompt
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| file_stem.to_string());

        Ok(Self {
            title:       prompt.title,
            content:     prompt.content,
            version:     prompt.version,
            tags:        prompt.tags,
            slug:        Some(slug),
            author:      file.author,
            notes:       prompt.notes,
            libs:        prompt.libs,
            description: prompt.description,
            category:    prompt.category,
            framework:   prompt.framework,
            created_at:  prompt.created_at,
            updated_at:  prompt.updated_at,
        })
    }

    /// Render the record in the on-disk TOML layout
    pub fn to_toml(&self) -> std::result::Result<String, String> {
        let file = RecordFile {
            author: self.author.clone(),
            prompt: PromptSection {
                title:       self.title.clone(),
                version:     self.version.clone(),
                tags:        self.tags.clone(),
                content:     self.content.clone(),
                notes:       self.notes.clone(),
                slug:        self.slug.clone(),
                libs:        self.libs.clone(),
                description: self.description.clone(),
                category:    self.category.clone(),
                framework:   self.framework.clone(),
                created_at:  self.created_at,
                updated_at:  self.updated_at,
            },
        };
        toml::to_string_pretty(&file).map_err(|e| e.to_string())
    }

    /// One-line summary shown under a title in the picker
    ///
    /// Author name, version and display tags, joined by a bullet.
    pub fn detail_line(&self) -> String {
        let tags = self
            .tags
            .iter()
            .map(|t| crate::tags::normalize_tag(t))
            .collect::<Vec<_>>()
            .join(", ");

        [
            self.author.as_ref().map(|a| a.name.clone()),
            Some(self.version.clone()),
            Some(tags),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<Author>,
    prompt: PromptSection,
}

// Field order here is the on-disk key order.
#[derive(Debug, Serialize, Deserialize)]
struct PromptSection {
    #[serde(default)]
    title:       String,
    #[serde(default = "default_version")]
    version:     String,
    #[serde(default)]
    tags:        Vec<String>,
    #[serde(default)]
    content:     String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug:        Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    libs:        Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category:    Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    framework:   Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_timestamp"
    )]
    created_at:  Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_timestamp"
    )]
    updated_at:  Option<DateTime<Utc>>,
}

/// Accept either an RFC 3339 string or a native TOML datetime
fn de_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(s)) => s,
        Some(toml::Value::Datetime(dt)) => dt.to_string(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a timestamp, found {}",
                other.type_str()
            )))
        },
    };

    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}
