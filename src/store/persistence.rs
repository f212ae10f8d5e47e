//! # Persistence Adapters
//!
//! Durable storage for collection snapshots. A snapshot is the full encoded
//! state of one collection; adapters only move opaque text around and never
//! interpret it.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use super::errors::{StoreError, StoreResult};

/// Trait for durable snapshot storage
pub trait Persistence: Send + Sync + std::fmt::Debug {
    /// Load the snapshot stored under `key`, or `None` if there is none
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the snapshot stored under `key`
    fn save(&self, key: &str, contents: &str) -> StoreResult<()>;

    /// Move an unreadable snapshot out of the way so it is not overwritten
    ///
    /// Returns a description of where it went.
    fn quarantine(&self, key: &str) -> StoreResult<String>;
}

/// JSON file-based persistence, one `<key>.json` file per collection
#[derive(Debug)]
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::corrupt(key, e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn save(&self, key: &str, contents: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, e))?;

        // Write beside the target and rename over it so readers never see a
        // half-written file.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|e| StoreError::io(key, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| StoreError::io(key, e))?;
        // The data must be on disk before the rename makes it visible.
        file.sync_all().map_err(|e| StoreError::io(key, e))?;

        fs::rename(&tmp, &path).map_err(|e| StoreError::io(key, e))?;

        // fsync the directory so the rename itself survives a crash
        if let Ok(dir) = File::open(&self.dir) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    fn quarantine(&self, key: &str) -> StoreResult<String> {
        let path = self.path_for(key);
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut target = self.dir.join(format!("{}.json.corrupt-{}", key, stamp));
        // rename replaces silently; never clobber an earlier quarantine
        let mut attempt = 1u32;
        while target.exists() {
            target = self
                .dir
                .join(format!("{}.json.corrupt-{}-{}", key, stamp, attempt));
            attempt += 1;
        }
        fs::rename(&path, &target).map_err(|e| StoreError::io(key, e))?;
        Ok(target.display().to_string())
    }
}

/// In-memory persistence for the non-durable run mode and tests
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshots: RwLock<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let snapshots = self.snapshots.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(snapshots.get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> StoreResult<()> {
        let mut snapshots = self.snapshots.write().map_err(|_| StoreError::LockPoisoned)?;
        snapshots.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn quarantine(&self, key: &str) -> StoreResult<String> {
        let mut snapshots = self.snapshots.write().map_err(|_| StoreError::LockPoisoned)?;
        snapshots.remove(key);
        Ok("discarded".to_string())
    }
}
