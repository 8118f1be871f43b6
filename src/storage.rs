// Persistence layer for Exercise Binder
// A string-keyed JSON blob store: "exercises" holds the store, "settings" the settings

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Settings, Store};

pub const EXERCISES_KEY: &str = "exercises";
pub const SETTINGS_KEY: &str = "settings";

// ============================================
// PATH HELPERS
// ============================================

/// App data directory (EXERCISE_BINDER_HOME, else <data dir>/exercise-binder)
pub fn appDataDir() -> PathBuf {
    if let Some(home) = std::env::var_os("EXERCISE_BINDER_HOME") {
        return PathBuf::from(home);
    }
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("exercise-binder")
}

/// Key-value file inside the data directory
pub fn configPath(dataDir: &Path) -> PathBuf {
    dataDir.join("config.json")
}

/// Where the extractor writes the images of one imported week
pub fn extractionDir(dataDir: &Path, courseName: &str, weekNumber: &str) -> PathBuf {
    dataDir
        .join("extractions")
        .join(courseName)
        .join(format!("week-{}", weekNumber))
}

// ============================================
// KEY-VALUE STORE
// ============================================

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<Value>;

    /// Overwrites the whole value for the key
    fn set(&mut self, key: &str, value: Value) -> AppResult<()>;

    fn getOr(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }
}

/// JSON object on disk, rewritten in full on every set
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> AppResult<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| AppError::Persistence(format!("{}: {}", path.display(), e)))?;
            match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    warn!("[JsonFileStore::open] {:?} is not a JSON object, starting empty", path);
                    Map::new()
                }
            }
        } else {
            debug!("[JsonFileStore::open] {:?} does not exist yet", path);
            Map::new()
        };

        Ok(Self { path, values })
    }

    fn flush(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::Persistence(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        // write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| AppError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| AppError::Persistence(e.to_string()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> AppResult<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// In-memory store. Clones share the same data, so a caller can keep a handle for inspection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    values: Map<String, Value>,
    writes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: Value) -> Self {
        let store = Self::new();
        store.inner.lock().values.insert(key.to_string(), value);
        store
    }

    /// Number of set() calls made for a key
    pub fn writes(&self, key: &str) -> usize {
        self.inner.lock().writes.iter().filter(|k| *k == key).count()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> AppResult<()> {
        let mut inner = self.inner.lock();
        inner.writes.push(key.to_string());
        inner.values.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================
// TYPED ACCESS
// ============================================

/// Raw persisted exercise data, not yet migrated
pub fn loadRawExercises(kv: &dyn KeyValueStore) -> Value {
    kv.getOr(EXERCISES_KEY, Value::Object(Map::new()))
}

pub fn saveExercises(kv: &mut dyn KeyValueStore, store: &Store) -> AppResult<()> {
    let value = serde_json::to_value(store).map_err(|e| AppError::Persistence(e.to_string()))?;
    kv.set(EXERCISES_KEY, value)
}

pub fn loadSettings(kv: &dyn KeyValueStore) -> Settings {
    match kv.get(SETTINGS_KEY) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("[loadSettings] Unreadable settings ({}), using defaults", e);
            Settings::default()
        }),
        None => Settings::default(),
    }
}

pub fn saveSettings(kv: &mut dyn KeyValueStore, settings: &Settings) -> AppResult<()> {
    let value = serde_json::to_value(settings).map_err(|e| AppError::Persistence(e.to_string()))?;
    kv.set(SETTINGS_KEY, value)
}
