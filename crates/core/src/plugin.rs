//! Plugin service container
//!
//! [`Plugin`] owns every service a command can reach: the record store, the
//! recent-selection log, the authoring form and the current picker session.
//! It is built explicitly from a [`PluginConfig`]. The FFI layer keeps the
//! one live instance in [`PLUGIN`] because Lua-callable closures must be
//! `'static`; nothing else reaches for it.

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::{
    config::PluginConfig,
    errors::{DeckError, Result},
    form::{AuthoringForm, FormRequest, FormResponse},
    picker::{self, Clipboard, Picker, PickerAction, PickerContext, PickerOutcome, PickerScreen},
    recent::RecentLog,
    state::{JsonFileStore, StateStore, FORM_STATE_FILE, GLOBAL_STATE_FILE},
    store::{PromptRecord, RecordStore},
};

pub struct Plugin {
    config:    PluginConfig,
    store:     RecordStore,
    recent:    RecentLog,
    form:      AuthoringForm,
    picker:    Picker,
    clipboard: Box<dyn Clipboard>,
}

impl Plugin {
    /// Services backed by state files under `config.state_dir`
    pub fn from_config(config: PluginConfig, clipboard: Box<dyn Clipboard>) -> Self {
        let global = JsonFileStore::new(config.state_dir.join(GLOBAL_STATE_FILE));
        let form = JsonFileStore::new(config.state_dir.join(FORM_STATE_FILE));
        Self::with_storage(config, Box::new(global), Box::new(form), clipboard)
    }

    /// Services backed by the given storage scopes
    pub fn with_storage(
        config: PluginConfig,
        global: Box<dyn StateStore>,
        form: Box<dyn StateStore>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        debug!(records = %config.records_dir.display(), "building plugin services");
        Self {
            store: RecordStore::new(&config.records_dir),
            recent: RecentLog::with_limit(global, config.recent_limit),
            form: AuthoringForm::new(form),
            picker: Picker::new(),
            clipboard,
            config,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn recent(&self) -> &RecentLog {
        &self.recent
    }

    pub fn form(&self) -> &AuthoringForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AuthoringForm {
        &mut self.form
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Start a fresh picker session
    pub fn open_picker(&mut self) -> PickerScreen {
        let ctx = PickerContext {
            store:        &self.store,
            recent:       &mut self.recent,
            clipboard:    self.clipboard.as_mut(),
            recent_shown: self.config.recent_shown,
        };
        self.picker.open(&ctx)
    }

    pub fn picker_action(&mut self, action: PickerAction) -> Result<PickerOutcome> {
        let mut ctx = PickerContext {
            store:        &self.store,
            recent:       &mut self.recent,
            clipboard:    self.clipboard.as_mut(),
            recent_shown: self.config.recent_shown,
        };
        self.picker.handle(action, &mut ctx)
    }

    /// Copy a recent entry's content without moving it in the log
    pub fn copy_recent(&mut self, title: &str, slug: Option<&str>) -> Result<PromptRecord> {
        let record = picker::resolve(&self.store, title, slug)
            .ok_or_else(|| DeckError::NotFound(title.to_string()))?;
        self.clipboard.write_text(&record.content)?;
        Ok(record)
    }

    pub fn submit(&mut self, request: FormRequest) -> FormResponse {
        self.form.handle(request, &self.store)
    }
}

/// The live instance used by the FFI layer
static PLUGIN: Lazy<Mutex<Option<Plugin>>> = Lazy::new(|| Mutex::new(None));

fn slot() -> MutexGuard<'static, Option<Plugin>> {
    // Calls arrive serially on Neovim's main thread; a poisoned lock only
    // means an earlier call panicked.
    PLUGIN.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replace the live instance
pub fn install(plugin: Plugin) {
    info!(records = %plugin.config.records_dir.display(), "plugin installed");
    *slot() = Some(plugin);
}

/// Run `f` against the live instance, building one with `init` first if
/// `setup()` was never called
pub fn with<T>(
    init: impl FnOnce() -> Plugin,
    f: impl FnOnce(&mut Plugin) -> Result<T>,
) -> Result<T> {
    let mut slot = slot();
    let plugin = slot.get_or_insert_with(init);
    f(plugin)
}
