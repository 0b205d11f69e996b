// Persisted UI preferences: a small key-value store, loaded once and saved on every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const ACTIVE_TAB_KEY: &str = "activeTab";
pub const SELECTED_ROOM_KEY: &str = "selectedRoom";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError>;

    /// Returns whether the key was present.
    fn remove(&self, key: &str) -> Result<bool, PrefsError>;

    fn keys(&self) -> Vec<String>;
}

/// Read a typed value. Entries that no longer match the expected shape are ignored.
pub fn load<T: DeserializeOwned>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed preference");
            None
        }
    }
}

pub fn save<T: Serialize>(store: &dyn PreferenceStore, key: &str, value: &T) -> Result<(), PrefsError> {
    store.set(key, serde_json::to_value(value)?)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    entries: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PrefsError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

/// Preferences kept in a JSON object on disk. The file is rewritten on every change.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FilePreferences {
    /// Open the store at `path`. A missing file is an empty store; it is created on first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "preferences loaded");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PrefsError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

/// Typed view over the preferences the tenant dashboard remembers.
pub struct UiPreferences<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> UiPreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active_tab(&self) -> Option<String> {
        load(&self.store, ACTIVE_TAB_KEY)
    }

    pub fn set_active_tab(&self, tab: &str) -> Result<(), PrefsError> {
        save(&self.store, ACTIVE_TAB_KEY, &tab)
    }

    pub fn selected_room(&self) -> Option<String> {
        load(&self.store, SELECTED_ROOM_KEY)
    }

    pub fn set_selected_room(&self, room_id: Option<&str>) -> Result<(), PrefsError> {
        match room_id {
            Some(id) => save(&self.store, SELECTED_ROOM_KEY, &id),
            None => self.store.remove(SELECTED_ROOM_KEY).map(|_| ()),
        }
    }
}
