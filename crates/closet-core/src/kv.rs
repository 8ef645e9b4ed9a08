//! Durable string key-value storage behind the persistence manager.
//!
//! # Table design
//!
//! [`RedbStore`] keeps a single `kv` table mapping entry names
//! (`wardrobeItems`, `darkMode`, ...) to their JSON text. A snapshot is
//! written with [`KvStore::put_all`], which commits every entry in one
//! write transaction, so readers never see half of a snapshot.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, TableDefinition};

use crate::error::{ClosetError, Result};

/// Key: entry name. Value: serialized entity.
const KV: TableDefinition<&str, &str> = TableDefinition::new("kv");

fn storage_err(e: impl Display) -> ClosetError {
    ClosetError::Storage(e.to_string())
}

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write every entry atomically: either all land or none do.
    fn put_all(&self, entries: &[(&str, String)]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`, creating the `kv` table so
    /// reads on a fresh file succeed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(storage_err)?;
        let wt = db.begin_write().map_err(storage_err)?;
        wt.open_table(KV).map_err(storage_err)?;
        wt.commit().map_err(storage_err)?;
        Ok(Self { db })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let rt = self.db.begin_read().map_err(storage_err)?;
        let table = rt.open_table(KV).map_err(storage_err)?;
        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|v| v.value().to_string()))
    }

    fn put_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let wt = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = wt.open_table(KV).map_err(storage_err)?;
            for (key, value) in entries {
                table.insert(*key, value.as_str()).map_err(storage_err)?;
            }
        }
        wt.commit().map_err(storage_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store. Clones share the same map, so a test can hand one
/// clone to a wardrobe and inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put_all` calls so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.lock().entries.insert(key.to_string(), value.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned map is still a valid map.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn put_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut inner = self.lock();
        for (key, value) in entries {
            inner.entries.insert((*key).to_string(), value.clone());
        }
        inner.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, RedbStore) {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn fresh_database_reads_none() {
        let (_dir, store) = open_tmp();
        assert_eq!(store.get("wardrobeItems").unwrap(), None);
    }

    #[test]
    fn put_all_then_get() {
        let (_dir, store) = open_tmp();
        store
            .put_all(&[("darkMode", "true".into()), ("wardrobeItems", "[]".into())])
            .unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(store.get("wardrobeItems").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/wardrobe.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.put_all(&[("darkMode", "false".into())]).unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn put_all_overwrites() {
        let (_dir, store) = open_tmp();
        store.put_all(&[("darkMode", "false".into())]).unwrap();
        store.put_all(&[("darkMode", "true".into())]).unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.put_all(&[("k", "v".into())]).unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.write_count(), 1);
    }
}
