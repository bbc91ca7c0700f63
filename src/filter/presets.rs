//! Saved filter presets
//!
//! Presets are a named snapshot of the active criteria, durably stored as
//! JSON under one key of a key-value store. The on-disk format is versioned;
//! loading migrates the legacy bare-array format and re-resolves criterion
//! ids through the alias table, reporting anything that no longer resolves.

use super::state::ActiveCriterion;
use crate::error::Result;
use crate::registry::{resolve_id, CriterionRegistry};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Storage key under which the preset file lives
pub const PRESET_STORE_KEY: &str = "stock_filter_presets";

/// Current on-disk format version
pub const PRESET_FORMAT_VERSION: u32 = 1;

/// Durable text key-value store
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed key-value store
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory store for tests and previews
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One saved preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    pub active: Vec<ActiveCriterion>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterPreset {
    pub fn new(name: &str, active: Vec<ActiveCriterion>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            active,
            created_at: Utc::now(),
        }
    }
}

/// Versioned preset file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetFile {
    pub version: u32,
    pub presets: Vec<FilterPreset>,
}

/// Preset persistence over a key-value store
pub struct PresetManager<S: KvStore> {
    store: S,
}

impl<S: KvStore> PresetManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load all presets, migrating legacy data and pruning dead criteria
    ///
    /// Criterion ids are re-resolved through the alias table; a preset entry
    /// whose id no longer resolves is dropped with a warning, never
    /// silently.
    pub fn load(&self, registry: &CriterionRegistry) -> Result<Vec<FilterPreset>> {
        let raw = match self.store.get(PRESET_STORE_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        let mut file = parse_preset_file(&raw)?;
        let migrated = file.version < PRESET_FORMAT_VERSION;

        for preset in &mut file.presets {
            preset.active.retain_mut(|criterion| {
                let canonical = resolve_id(&criterion.id).to_string();
                match registry.lookup(&canonical) {
                    Some(_) => {
                        criterion.id = canonical;
                        true
                    }
                    None => {
                        warn!(
                            "preset '{}': criterion id '{}' no longer resolves, dropped",
                            preset.name, criterion.id
                        );
                        false
                    }
                }
            });
        }

        if migrated {
            info!(
                "migrated preset store to format v{} ({} presets)",
                PRESET_FORMAT_VERSION,
                file.presets.len()
            );
            self.save_all(&file.presets)?;
        }

        Ok(file.presets)
    }

    /// Persist the full preset list
    pub fn save_all(&self, presets: &[FilterPreset]) -> Result<()> {
        let file = PresetFile {
            version: PRESET_FORMAT_VERSION,
            presets: presets.to_vec(),
        };
        self.store.set(PRESET_STORE_KEY, &serde_json::to_string(&file)?)
    }

    /// Append one preset and persist
    pub fn add(&self, registry: &CriterionRegistry, preset: FilterPreset) -> Result<Vec<FilterPreset>> {
        let mut presets = self.load(registry)?;
        presets.push(preset);
        self.save_all(&presets)?;
        Ok(presets)
    }

    /// Remove a preset by id and persist
    pub fn remove(&self, registry: &CriterionRegistry, id: &str) -> Result<Vec<FilterPreset>> {
        let mut presets = self.load(registry)?;
        presets.retain(|p| p.id != id);
        self.save_all(&presets)?;
        Ok(presets)
    }
}

/// Parse either the versioned format or the legacy bare array
fn parse_preset_file(raw: &str) -> Result<PresetFile> {
    if let Ok(file) = serde_json::from_str::<PresetFile>(raw) {
        return Ok(file);
    }
    let presets: Vec<FilterPreset> = serde_json::from_str(raw)?;
    Ok(PresetFile {
        version: 0,
        presets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::state::ActiveCriterion;

    fn sample_active(registry: &CriterionRegistry, id: &str) -> ActiveCriterion {
        ActiveCriterion::from_def(registry.lookup(id).expect("known id"))
    }

    #[test]
    fn test_round_trip_through_memory_store() {
        let registry = CriterionRegistry::new();
        let manager = PresetManager::new(MemoryKvStore::default());

        assert!(manager.load(&registry).unwrap().is_empty());

        let preset = FilterPreset::new(
            "Cổ phiếu cơ bản tốt",
            vec![
                sample_active(&registry, "von_hoa_popular"),
                sample_active(&registry, "roe_popular"),
            ],
        );
        manager.add(&registry, preset.clone()).unwrap();

        let loaded = manager.load(&registry).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Cổ phiếu cơ bản tốt");
        assert_eq!(loaded[0].active.len(), 2);

        manager.remove(&registry, &preset.id).unwrap();
        assert!(manager.load(&registry).unwrap().is_empty());
    }

    #[test]
    fn test_legacy_array_is_migrated_and_aliases_resolved() {
        let registry = CriterionRegistry::new();
        let store = MemoryKvStore::default();
        // legacy format: bare array, pre-alias id spelling, one dead id
        store
            .set(
                PRESET_STORE_KEY,
                r#"[{
                    "id": "p1",
                    "name": "Cũ",
                    "active": [
                        {"id": "von_hoa", "label": "Vốn hóa", "control": "range",
                         "group": "popular", "values": {"min": 100, "max": 500}},
                        {"id": "da_xoa", "label": "Đã xóa", "control": "range",
                         "group": "basic", "values": {}}
                    ],
                    "createdAt": "2024-01-05T00:00:00Z"
                }]"#,
            )
            .unwrap();

        let manager = PresetManager::new(store);
        let presets = manager.load(&registry).unwrap();
        assert_eq!(presets.len(), 1);
        // alias remapped to canonical, dead id dropped
        assert_eq!(presets[0].active.len(), 1);
        assert_eq!(presets[0].active[0].id, "von_hoa_popular");

        // migration rewrote the store in the versioned format
        let raw = manager.store.get(PRESET_STORE_KEY).unwrap().unwrap();
        let file: PresetFile = serde_json::from_str(&raw).unwrap();
        assert_eq!(file.version, PRESET_FORMAT_VERSION);
    }

    #[test]
    fn test_sqlite_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteKvStore::new(&dir.path().join("screener.db")).unwrap();

        assert!(store.get("missing").unwrap().is_none());
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }
}
