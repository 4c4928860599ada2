//! Persisted playback preferences
//!
//! Volume, mute, and playback rate survive across sessions. The store is
//! read once when the engine is constructed and written synchronously on
//! every user-driven change. Storage failures of any kind are silent: the
//! engine proceeds with in-memory defaults, matching the behavior of a
//! browser profile with local storage disabled.

use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Fixed storage keys, stable across releases. No schema versioning.
pub const KEY_VOLUME: &str = "player.volume";
pub const KEY_MUTED: &str = "player.muted";
pub const KEY_RATE: &str = "player.rate";

/// Snapshot of the persisted preferences, with defaults filled in for
/// missing or corrupt entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredPreferences {
    pub volume: f64,
    pub muted: bool,
    pub rate: f64,
}

impl Default for StoredPreferences {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            rate: 1.0,
        }
    }
}

/// Durable key/value store for playback preferences
pub trait PreferenceStore: Send + Sync {
    /// Read the persisted preferences, falling back to defaults for
    /// anything missing or unreadable
    fn load(&self) -> StoredPreferences;

    /// Persist the volume level
    fn save_volume(&self, volume: f64);

    /// Persist the muted flag
    fn save_muted(&self, muted: bool);

    /// Persist the playback rate
    fn save_rate(&self, rate: f64);
}

/// JSON-file-backed preference store
///
/// Entries live in a single `preferences.json` map under the platform
/// config directory. Reads and writes never raise: a corrupt file, a
/// missing directory, or a read-only filesystem all degrade to defaults.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at the default platform location
    pub fn open_default() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("clipset");
        path.push("preferences.json");
        Self::open(path)
    }

    /// Open the store at an explicit path
    pub fn open(path: PathBuf) -> Self {
        let entries = Self::read_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn read_entries(path: &PathBuf) -> HashMap<String, Value> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }

    fn write_entry(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(&*entries) {
            if std::fs::write(&self.path, data).is_err() {
                debug!("preference write failed, continuing with in-memory value");
            }
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> StoredPreferences {
        let entries = self.entries.lock();
        let defaults = StoredPreferences::default();
        StoredPreferences {
            volume: entries
                .get(KEY_VOLUME)
                .and_then(Value::as_f64)
                .filter(|v| (0.0..=1.0).contains(v))
                .unwrap_or(defaults.volume),
            muted: entries
                .get(KEY_MUTED)
                .and_then(Value::as_bool)
                .unwrap_or(defaults.muted),
            rate: entries
                .get(KEY_RATE)
                .and_then(Value::as_f64)
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(defaults.rate),
        }
    }

    fn save_volume(&self, volume: f64) {
        self.write_entry(KEY_VOLUME, Value::from(volume));
    }

    fn save_muted(&self, muted: bool) {
        self.write_entry(KEY_MUTED, Value::from(muted));
    }

    fn save_rate(&self, rate: f64) {
        self.write_entry(KEY_RATE, Value::from(rate));
    }
}

/// In-memory store for hosts without durable storage, and for tests
#[derive(Default)]
pub struct MemoryStore {
    prefs: Mutex<StoredPreferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with explicit values
    pub fn with(prefs: StoredPreferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> StoredPreferences {
        *self.prefs.lock()
    }

    fn save_volume(&self, volume: f64) {
        self.prefs.lock().volume = volume;
    }

    fn save_muted(&self, muted: bool) {
        self.prefs.lock().muted = muted;
    }

    fn save_rate(&self, rate: f64) {
        self.prefs.lock().rate = rate;
    }
}
