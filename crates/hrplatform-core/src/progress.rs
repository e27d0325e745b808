//! Persisted learner progress and preferences.
//!
//! Everything lives behind [`KeyValueStore`]: the progress object is one
//! JSON blob under [`PROGRESS_KEY`], theme and language are plain strings
//! under their own keys. A backend failure is logged and treated as a
//! no-op so navigation never breaks because storage is unavailable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::{Language, Theme};

pub const PROGRESS_KEY: &str = "hrplatform_progress";
pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

/// Oldest quiz attempts beyond this are discarded.
pub const HISTORY_LIMIT: usize = 50;
/// The time-spent counter is persisted once per this many seconds.
pub const TIME_FLUSH_SECS: u64 = 60;
/// Scores kept in [`ProgressStats::recent`].
pub const RECENT_SCORES: usize = 10;

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `keys` from `source`. Writes to the copy never reach
    /// `source`; unreadable keys are left out.
    pub fn snapshot(source: &dyn KeyValueStore, keys: &[&str]) -> Self {
        let store = Self::new();
        for key in keys {
            match source.get(key) {
                Ok(Some(value)) => {
                    let _ = store.set(key, &value);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("could not read {key}: {e}"),
            }
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object file mapping keys to string values.
///
/// Every write rewrites the whole file through a sibling temp file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self, key: &str) -> Result<HashMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    key: key.to_string(),
                    message: format!("{}: {e}", self.path.display()),
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            message: format!("{}: {e}", self.path.display()),
        })
    }

    fn write_map(&self, key: &str, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let write_err = |message: String| StorageError::Write {
            key: key.to_string(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| write_err(format!("{}: {e}", parent.display())))?;
            }
        }
        let json = serde_json::to_string_pretty(map).map_err(|e| write_err(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| write_err(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| write_err(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.read_map(key)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let mut map = self.read_map(key)?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(key, &map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let mut map = self.read_map(key)?;
        if map.remove(key).is_some() {
            self.write_map(key, &map)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// One completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub date: DateTime<Utc>,
    pub category: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
}

/// The persisted progress object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    pub quiz_history: Vec<QuizAttempt>,
    pub viewed_treaties: Vec<String>,
    pub viewed_institutions: Vec<String>,
    /// Seconds spent on the site.
    pub time_spent: u64,
    pub last_visit: Option<DateTime<Utc>>,
    /// Keys written by other versions, carried through re-saves.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What kind of record a view refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Treaty,
    Institution,
}

/// Aggregates over the quiz history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub attempts: usize,
    /// Rounded mean percentage.
    pub average: u32,
    pub best: u32,
    /// Up to the last ten percentages, oldest first.
    pub recent: Vec<u32>,
}

/// Rounded percentage of `score` out of `total`; 0 for an empty quiz.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

/// Progress object bound to a storage backend.
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
    progress: Progress,
}

impl ProgressStore {
    /// A store holding default progress; call [`ProgressStore::load`] to
    /// pick up persisted state.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            progress: Progress::default(),
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Merge the persisted object over the current one key by key
    /// (persisted keys win), stamp the visit time and save.
    pub fn load(&mut self) {
        match self.store.get(PROGRESS_KEY) {
            Ok(Some(saved)) => match merge_progress(&self.progress, &saved) {
                Ok(merged) => self.progress = merged,
                Err(e) => tracing::warn!("could not load progress: {e}"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("could not load progress: {e}"),
        }
        self.progress.last_visit = Some(Utc::now());
        self.save();
    }

    /// Persist the current object. Failures are logged and ignored.
    pub fn save(&self) {
        let result = serde_json::to_string(&self.progress)
            .map_err(|e| StorageError::Malformed {
                key: PROGRESS_KEY.to_string(),
                message: e.to_string(),
            })
            .and_then(|json| self.store.set(PROGRESS_KEY, &json));
        if let Err(e) = result {
            tracing::warn!("could not save progress: {e}");
        }
    }

    /// Append a finished quiz, keeping only the newest [`HISTORY_LIMIT`].
    pub fn record_quiz_attempt(&mut self, category: &str, score: u32, total: u32) {
        self.progress.quiz_history.push(QuizAttempt {
            date: Utc::now(),
            category: category.to_string(),
            score,
            total,
            percentage: percentage(score, total),
        });
        let len = self.progress.quiz_history.len();
        if len > HISTORY_LIMIT {
            self.progress.quiz_history.drain(..len - HISTORY_LIMIT);
        }
        self.save();
    }

    /// Remember that `id` was opened. Returns false when it already was.
    pub fn record_view(&mut self, kind: ViewKind, id: &str) -> bool {
        let list = match kind {
            ViewKind::Treaty => &mut self.progress.viewed_treaties,
            ViewKind::Institution => &mut self.progress.viewed_institutions,
        };
        if list.iter().any(|v| v == id) {
            return false;
        }
        list.push(id.to_string());
        self.save();
        true
    }

    /// Count one second on the site; persisted every [`TIME_FLUSH_SECS`].
    pub fn tick(&mut self) {
        self.progress.time_spent += 1;
        if self.progress.time_spent % TIME_FLUSH_SECS == 0 {
            self.save();
        }
    }

    pub fn stats(&self) -> ProgressStats {
        let scores: Vec<u32> = self
            .progress
            .quiz_history
            .iter()
            .map(|h| h.percentage)
            .collect();
        if scores.is_empty() {
            return ProgressStats::default();
        }
        let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        ProgressStats {
            attempts: scores.len(),
            average: (sum as f64 / scores.len() as f64).round() as u32,
            best: scores.iter().copied().max().unwrap_or(0),
            recent: scores[scores.len().saturating_sub(RECENT_SCORES)..].to_vec(),
        }
    }

    /// Forget everything, in storage and in memory.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(PROGRESS_KEY) {
            tracing::warn!("could not clear progress: {e}");
        }
        self.progress = Progress::default();
    }
}

fn merge_progress(current: &Progress, saved: &str) -> Result<Progress, StorageError> {
    let malformed = |e: serde_json::Error| StorageError::Malformed {
        key: PROGRESS_KEY.to_string(),
        message: e.to_string(),
    };
    let saved: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(saved).map_err(malformed)?;
    let mut merged = match serde_json::to_value(current).map_err(malformed)? {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    // A key that does not fit keeps its current value; the rest still apply.
    for (key, value) in saved {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value);
        match serde_json::from_value::<Progress>(serde_json::Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => tracing::warn!(key = %key, "ignoring malformed progress field: {e}"),
        }
    }
    serde_json::from_value(serde_json::Value::Object(merged)).map_err(malformed)
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Theme and language, persisted as plain strings.
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved theme, if any and valid.
    pub fn theme(&self) -> Option<Theme> {
        self.read(THEME_KEY)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.write(THEME_KEY, &theme.to_string());
    }

    /// Flip the theme (starting from `current`) and persist the result.
    pub fn toggle_theme(&self, current: Theme) -> Theme {
        let next = current.toggled();
        self.set_theme(next);
        next
    }

    pub fn language(&self) -> Option<Language> {
        self.read(LANGUAGE_KEY)
    }

    pub fn set_language(&self, language: Language) {
        self.write(LANGUAGE_KEY, &language.to_string());
    }

    fn read<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        match self.store.get(key) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                tracing::warn!("could not read preference: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("could not save preference: {e}");
        }
    }
}
