//! Selection picker state machine
//!
//! The Lua side renders whatever [`PickerScreen`] it is handed and reports
//! the user's choice back as a [`PickerAction`]. States:
//!
//! - `Main`: create-new action, recent picks, tags by count
//! - `Category(tag)`: records carrying `tag`
//! - `Closed`: after a record was copied or the form was requested
//!
//! [`Picker::open`] always starts over from `Main`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::{DeckError, Result},
    recent::{RecentLog, RecentSelection},
    store::{PromptRecord, RecordStore},
    tags::{format_count, normalize_tag, TagIndex},
};

pub const CREATE_SECTION_LABEL: &str = "Create Custom Prompt";
pub const CREATE_NEW_LABEL: &str = "Create New Prompt";
pub const RECENT_SECTION_LABEL: &str = "Recent";
pub const TAG_SECTION_LABEL: &str = "By Tag";

/// Recent picks shown on the main view
pub const DEFAULT_RECENT_SHOWN: usize = 5;

/// Destination for copied prompt content
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerView {
    Main,
    Category(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PickerItem {
    Separator {
        label: String,
    },
    CreateNew {
        label:  String,
        detail: String,
    },
    Recent {
        title:       String,
        slug:        Option<String>,
        detail:      String,
        /// Relative age of the pick ("3h")
        description: String,
        timestamp:   i64,
    },
    Tag {
        label:       String,
        tag:         String,
        count:       usize,
        description: String,
    },
    Prompt {
        title:  String,
        slug:   Option<String>,
        detail: String,
    },
}

/// Everything the UI needs to draw one picker state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerScreen {
    pub title:       String,
    pub placeholder: String,
    /// Whether a back action is offered
    pub back:        bool,
    pub items:       Vec<PickerItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PickerAction {
    ChooseTag {
        tag: String,
    },
    Back,
    ChooseRecord {
        title: String,
        #[serde(default)]
        slug:  Option<String>,
    },
    CreateNew,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PickerOutcome {
    /// Stay open and draw this screen
    Show(PickerScreen),
    /// Content is on the clipboard; picker closed
    Copied {
        title:   String,
        slug:    Option<String>,
        content: String,
    },
    /// Picker closed; open the authoring form
    OpenForm,
}

/// Collaborators a picker action may touch
pub struct PickerContext<'a> {
    pub store:        &'a RecordStore,
    pub recent:       &'a mut RecentLog,
    pub clipboard:    &'a mut dyn Clipboard,
    pub recent_shown: usize,
}

#[derive(Debug)]
pub struct Picker {
    view: PickerView,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker {
    pub fn new() -> Self {
        Self {
            view: PickerView::Main,
        }
    }

    pub fn view(&self) -> &PickerView {
        &self.view
    }

    /// Reset to the main view and draw it
    pub fn open(&mut self, ctx: &PickerContext<'_>) -> PickerScreen {
        self.view = PickerView::Main;
        main_screen(ctx)
    }

    pub fn handle(&mut self, action: PickerAction, ctx: &mut PickerContext<'_>) -> Result<PickerOutcome> {
        if self.view == PickerView::Closed {
            return Err(DeckError::PickerClosed);
        }
        debug!(?action, view = ?self.view, "picker action");

        match action {
            PickerAction::ChooseTag { tag } => {
                let tag = tag.to_lowercase();
                let screen = category_screen(ctx.store, &tag);
                self.view = PickerView::Category(tag);
                Ok(PickerOutcome::Show(screen))
            },
            PickerAction::Back => {
                self.view = PickerView::Main;
                Ok(PickerOutcome::Show(main_screen(ctx)))
            },
            PickerAction::ChooseRecord { title, slug } => {
                let record = resolve(ctx.store, &title, slug.as_deref())
                    .ok_or_else(|| DeckError::NotFound(title.clone()))?;

                ctx.clipboard.write_text(&record.content)?;
                if let Err(err) = ctx.recent.record(&record.title, record.slug.as_deref()) {
                    warn!(error = %err, "failed to record recent selection");
                }

                self.view = PickerView::Closed;
                Ok(PickerOutcome::Copied {
                    title:   record.title,
                    slug:    record.slug,
                    content: record.content,
                })
            },
            PickerAction::CreateNew => {
                self.view = PickerView::Closed;
                Ok(PickerOutcome::OpenForm)
            },
        }
    }
}

/// Look a record up by slug first, then by title
pub fn resolve(store: &RecordStore, title: &str, slug: Option<&str>) -> Option<PromptRecord> {
    slug.and_then(|slug| store.find_by_slug(slug))
        .or_else(|| store.find_by_title(title))
}

fn main_screen(ctx: &PickerContext<'_>) -> PickerScreen {
    let mut items = vec![
        PickerItem::Separator {
            label: CREATE_SECTION_LABEL.to_string(),
        },
        PickerItem::CreateNew {
            label:  CREATE_NEW_LABEL.to_string(),
            detail: "Create a custom prompt with your own content".to_string(),
        },
    ];

    let now = Utc::now().timestamp_millis();
    let recent: Vec<PickerItem> = ctx
        .recent
        .list()
        .into_iter()
        .take(ctx.recent_shown)
        .filter_map(|entry| recent_item(ctx.store, entry, now))
        .collect();
    if !recent.is_empty() {
        items.push(PickerItem::Separator {
            label: RECENT_SECTION_LABEL.to_string(),
        });
        items.extend(recent);
    }

    let index = TagIndex::from_counts(ctx.store.tag_counts());
    if !index.is_empty() {
        items.push(PickerItem::Separator {
            label: TAG_SECTION_LABEL.to_string(),
        });
        items.extend(index.entries().iter().map(|entry| PickerItem::Tag {
            label:       normalize_tag(&entry.tag),
            tag:         entry.tag.clone(),
            count:       entry.count,
            description: format!("({})", format_count(entry.count)),
        }));
    }

    PickerScreen {
        title: "Select a Prompt".to_string(),
        placeholder: "Type to search prompts or browse by category".to_string(),
        back: false,
        items,
    }
}

fn recent_item(store: &RecordStore, entry: RecentSelection, now: i64) -> Option<PickerItem> {
    let record = resolve(store, &entry.title, entry.slug.as_deref())?;
    Some(PickerItem::Recent {
        title:       record.title.clone(),
        slug:        record.slug.clone(),
        detail:      record.detail_line(),
        description: relative_time(entry.timestamp, now),
        timestamp:   entry.timestamp,
    })
}

fn category_screen(store: &RecordStore, tag: &str) -> PickerScreen {
    let items = store
        .list_by_tag(tag)
        .into_iter()
        .map(|record| PickerItem::Prompt {
            detail: record.detail_line(),
            title:  record.title,
            slug:   record.slug,
        })
        .collect();

    PickerScreen {
        title: format!("Prompts • {}", normalize_tag(tag)),
        placeholder: "Search prompts in this category".to_string(),
        back: true,
        items,
    }
}

/// Age of a millisecond timestamp: `just now`, `12m`, `5h`, `3d`, then a
/// short date
pub fn relative_time(timestamp: i64, now: i64) -> String {
    let diff = (now - timestamp).max(0);
    let minutes = diff / 60_000;
    let hours = diff / 3_600_000;
    let days = diff / 86_400_000;

    if minutes < 5 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if hours < 24 {
        format!("{}h", hours)
    } else if days < 7 {
        format!("{}d", days)
    } else {
        DateTime::<Utc>::from_timestamp_millis(timestamp)
            .map(|dt| dt.format("%b %-d").to_string())
            .unwrap_or_default()
    }
}
