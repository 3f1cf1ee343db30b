//! Persisted setup preferences (last used settings and player names).
//!
//! The game itself never touches storage; the front end loads a draft at
//! startup and saves it after each edit through a `PreferenceStore`.
//! Stored data is coerced leniently: anything unreadable falls back to the
//! defaults instead of failing.

use crate::setup::{MIN_PLAYERS, MIN_SPIES};
use crate::types::*;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Mutex;

pub const SETTINGS_FILE: &str = "settings.json";
pub const PLAYERS_FILE: &str = "players.json";

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw key/value storage for preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the raw document stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>, PrefsError>;

    /// Replace the document stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Stores each key as a JSON file in a directory
pub struct FilePreferenceStore {
    dir: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PrefsError> {
        match tokio::fs::read_to_string(self.dir.join(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(key), value).await?;
        Ok(())
    }
}

/// In-process store, handy for tests and for running without a data dir
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Merge stored settings over the defaults.
///
/// Unknown or mistyped fields keep their default value. A `categories`
/// value that is not a list is replaced by the default categories; unknown
/// category names inside a list are dropped.
pub fn coerce_settings(stored: &Value) -> GameSettings {
    let mut settings = GameSettings::default();
    let Some(obj) = stored.as_object() else {
        return settings;
    };

    if let Some(n) = obj.get("spy_count").and_then(Value::as_u64) {
        settings.spy_count = (n as usize).max(MIN_SPIES);
    }
    if let Some(n) = obj.get("timer_duration").and_then(Value::as_u64) {
        settings.timer_duration = u32::try_from(n).unwrap_or(settings.timer_duration);
    }
    if let Some(b) = obj.get("show_category_to_spy").and_then(Value::as_bool) {
        settings.show_category_to_spy = b;
    }
    if let Some(b) = obj.get("show_letter_count_to_spy").and_then(Value::as_bool) {
        settings.show_letter_count_to_spy = b;
    }
    if let Some(b) = obj.get("show_first_letter_to_spy").and_then(Value::as_bool) {
        settings.show_first_letter_to_spy = b;
    }
    if let Some(list) = obj.get("categories").and_then(Value::as_array) {
        settings.categories = list
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|s| s.parse::<WordCategory>().ok())
            .collect();
    }

    settings
}

/// Stored names must be a list of strings with at least three entries
pub fn coerce_players(stored: &Value) -> Vec<String> {
    let defaults = vec![String::new(); MIN_PLAYERS];
    let Some(list) = stored.as_array() else {
        return defaults;
    };

    let names: Option<Vec<String>> = list
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect();

    match names {
        Some(names) if names.len() >= MIN_PLAYERS => names,
        _ => defaults,
    }
}

async fn read_json(store: &dyn PreferenceStore, key: &str) -> Result<Option<Value>, PrefsError> {
    match store.read(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Load saved settings, falling back to defaults on any problem
pub async fn load_settings(store: &dyn PreferenceStore) -> GameSettings {
    match read_json(store, SETTINGS_FILE).await {
        Ok(Some(value)) => coerce_settings(&value),
        Ok(None) => GameSettings::default(),
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            GameSettings::default()
        }
    }
}

/// Load saved player names, falling back to three blank slots
pub async fn load_players(store: &dyn PreferenceStore) -> Vec<String> {
    match read_json(store, PLAYERS_FILE).await {
        Ok(Some(value)) => coerce_players(&value),
        Ok(None) => vec![String::new(); MIN_PLAYERS],
        Err(e) => {
            tracing::warn!("Failed to load players, using defaults: {}", e);
            vec![String::new(); MIN_PLAYERS]
        }
    }
}

/// Save settings; failures are logged and swallowed
pub async fn save_settings(store: &dyn PreferenceStore, settings: &GameSettings) {
    let result = match serde_json::to_string_pretty(settings) {
        Ok(json) => store.write(SETTINGS_FILE, &json).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        tracing::error!("Failed to save settings: {}", e);
    }
}

/// Save player names; failures are logged and swallowed
pub async fn save_players(store: &dyn PreferenceStore, names: &[String]) {
    let result = match serde_json::to_string_pretty(names) {
        Ok(json) => store.write(PLAYERS_FILE, &json).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        tracing::error!("Failed to save players: {}", e);
    }
}
