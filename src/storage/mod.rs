//! Persistent key/value preferences.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR};

const PREFERENCES_FILE: &str = "preferences.json";

pub mod keys {
    pub const LANGUAGE: &str = "cv-language";
    pub const THEME: &str = "cv-theme";
    pub const COLOR_THEME: &str = "cv-color-theme";
    pub const EXPORT_COUNT: &str = "cv-export-count";
    pub const LAST_EXPORT: &str = "cv-last-export";
    pub const PREFERRED_FORMAT: &str = "cv-preferred-format";
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error(transparent)]
    ConfigPath(#[from] ConfigPathError),
    #[error("failed to read preferences: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write preferences: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize preferences")]
    Serialize(#[from] serde_json::Error),
}

pub type PreferenceResult<T> = std::result::Result<T, PreferenceError>;

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> PreferenceResult<()>;
    fn remove(&self, key: &str) -> PreferenceResult<()>;
}

/// Writes `value` under `key`, logging instead of failing the caller.
pub fn persist(store: &dyn PreferenceStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(key, value, ?err, "failed to persist preference");
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.values.borrow_mut().extend(
            values
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Flat JSON string map persisted under the XDG config directory.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    pub fn open_default() -> PreferenceResult<Self> {
        let (xdg_config_home, home) = config_env_dirs();
        let path = app_config_path(
            APP_DIR,
            PREFERENCES_FILE,
            xdg_config_home.as_deref(),
            home.as_deref(),
        )?;
        Self::open(path)
    }

    pub fn open(path: PathBuf) -> PreferenceResult<Self> {
        let values = if path.exists() {
            let serialized = fs::read_to_string(&path).map_err(|source| PreferenceError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&serialized).unwrap_or_else(|err| {
                tracing::warn!(?err, path = %path.display(), "corrupt preferences file; starting empty");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `values` to disk; memory is updated by the caller only on success.
    fn flush(&self, values: &BTreeMap<String, String>) -> PreferenceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let serialized = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, serialized).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        let mut next = self.values.borrow().clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *self.values.borrow_mut() = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        let mut next = self.values.borrow().clone();
        if next.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&next)?;
        *self.values.borrow_mut() = next;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatistics {
    pub total_exports: u64,
    pub last_export: Option<DateTime<Utc>>,
    pub preferred_format: String,
}

impl ExportStatistics {
    pub fn read(store: &dyn PreferenceStore) -> Self {
        Self {
            total_exports: store
                .get(keys::EXPORT_COUNT)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
            last_export: store
                .get(keys::LAST_EXPORT)
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|stamp| stamp.with_timezone(&Utc)),
            preferred_format: store
                .get(keys::PREFERRED_FORMAT)
                .unwrap_or_else(|| "PDF".to_string()),
        }
    }

    /// Records one successful export and returns the updated counters.
    pub fn record(store: &dyn PreferenceStore, format_label: &str, at: DateTime<Utc>) -> Self {
        let current = Self::read(store);
        let total_exports = current.total_exports.saturating_add(1);
        persist(store, keys::EXPORT_COUNT, &total_exports.to_string());
        persist(store, keys::LAST_EXPORT, &at.to_rfc3339());
        persist(store, keys::PREFERRED_FORMAT, format_label);
        Self {
            total_exports,
            last_export: Some(at),
            preferred_format: format_label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_store_round_trips_through_disk() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("cvpage").join(PREFERENCES_FILE);

        let store = FilePreferenceStore::open(path.clone()).unwrap();
        store.set(keys::LANGUAGE, "ar").unwrap();
        store.set(keys::THEME, "dark").unwrap();

        let reopened = FilePreferenceStore::open(path).unwrap();
        assert_eq!(reopened.get(keys::LANGUAGE).as_deref(), Some("ar"));
        assert_eq!(reopened.get(keys::THEME).as_deref(), Some("dark"));

        reopened.remove(keys::THEME).unwrap();
        assert!(reopened.get(keys::THEME).is_none());
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("cvpage").join(PREFERENCES_FILE);
        let store = FilePreferenceStore::open(path).unwrap();
        store.set(keys::LANGUAGE, "en").unwrap();

        // A regular file where the config directory should be blocks every write.
        std::fs::remove_dir_all(root.path().join("cvpage")).unwrap();
        std::fs::write(root.path().join("cvpage"), "").unwrap();

        assert!(matches!(
            store.set(keys::LANGUAGE, "ar"),
            Err(PreferenceError::Write { .. })
        ));
        assert_eq!(store.get(keys::LANGUAGE).as_deref(), Some("en"));

        assert!(store.remove(keys::LANGUAGE).is_err());
        assert_eq!(store.get(keys::LANGUAGE).as_deref(), Some("en"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "not json").unwrap();

        let store = FilePreferenceStore::open(path).unwrap();
        assert!(store.get(keys::LANGUAGE).is_none());
    }

    #[test]
    fn statistics_default_when_nothing_recorded() {
        let store = MemoryPreferenceStore::new();
        let stats = ExportStatistics::read(&store);
        assert_eq!(stats.total_exports, 0);
        assert!(stats.last_export.is_none());
        assert_eq!(stats.preferred_format, "PDF");
    }

    #[test]
    fn statistics_record_increments_and_stamps() {
        let store = MemoryPreferenceStore::with_values([(keys::EXPORT_COUNT, "4")]);
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();

        let stats = ExportStatistics::record(&store, "PNG", at);
        assert_eq!(stats.total_exports, 5);
        assert_eq!(ExportStatistics::read(&store), stats);
        assert_eq!(store.get(keys::PREFERRED_FORMAT).as_deref(), Some("PNG"));
    }

    #[test]
    fn unparsable_count_resets_to_zero() {
        let store = MemoryPreferenceStore::with_values([(keys::EXPORT_COUNT, "many")]);
        assert_eq!(ExportStatistics::read(&store).total_exports, 0);
    }
}
