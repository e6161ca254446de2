// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value storage capability backing the registry.
//!
//! Keys are ordered tuples of string parts (`["url", owner]`). `list` returns
//! entries under a prefix in ascending key order, which is the order the
//! registry hands URLs to the aggregator.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

/// Composite store key.
pub type KvKey = Vec<String>;

/// Build a key from borrowed parts.
pub fn key(parts: &[&str]) -> KvKey {
    parts.iter().map(|p| (*p).to_owned()).collect()
}

/// Store failure, split by direction so callers can report read vs. write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Read(String),
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "store read failed: {msg}"),
            Self::Write(msg) => write!(f, "store write failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Injected durable key-value store.
///
/// Implementations provide atomic per-key writes; callers do no locking.
pub trait KvStore: Send + Sync {
    /// Set `key` to `value`, replacing any previous value.
    fn put(&self, key: KvKey, value: String) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn list(&self, prefix: &[&str]) -> Result<Vec<(KvKey, String)>, StoreError>;
}

fn has_prefix(key: &[String], prefix: &[&str]) -> bool {
    key.len() >= prefix.len() && key.iter().zip(prefix).all(|(a, b)| a == b)
}

fn collect_prefix(map: &BTreeMap<KvKey, String>, prefix: &[&str]) -> Vec<(KvKey, String)> {
    let start: KvKey = key(prefix);
    map.range(start..)
        .take_while(|(k, _)| has_prefix(k, prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// -- Memory -------------------------------------------------------------------

/// In-process store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<KvKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn put(&self, key: KvKey, value: String) -> Result<(), StoreError> {
        let mut entries =
            self.entries.write().map_err(|_| StoreError::Write("lock poisoned".to_owned()))?;
        entries.insert(key, value);
        Ok(())
    }

    fn list(&self, prefix: &[&str]) -> Result<Vec<(KvKey, String)>, StoreError> {
        let entries =
            self.entries.read().map_err(|_| StoreError::Read("lock poisoned".to_owned()))?;
        Ok(collect_prefix(&entries, prefix))
    }
}

// -- File ---------------------------------------------------------------------

/// On-disk layout: a flat list of entries.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedStore {
    entries: Vec<PersistedEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    key: KvKey,
    value: String,
}

/// Store persisted to a single JSON file.
///
/// Reads are served from memory. Each `put` rewrites the whole file
/// (write temp + rename) before the in-memory copy is updated, so a failed
/// write leaves both sides unchanged.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<KvKey, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let persisted: PersistedStore = serde_json::from_str(&contents)
                    .map_err(|e| StoreError::Read(format!("{}: {e}", path.display())))?;
                persisted.entries.into_iter().map(|e| (e.key, e.value)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Read(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for FileStore {
    fn put(&self, key: KvKey, value: String) -> Result<(), StoreError> {
        let mut entries =
            self.entries.lock().map_err(|_| StoreError::Write("lock poisoned".to_owned()))?;
        let mut next = entries.clone();
        next.insert(key, value);
        save(&self.path, &next)?;
        *entries = next;
        Ok(())
    }

    fn list(&self, prefix: &[&str]) -> Result<Vec<(KvKey, String)>, StoreError> {
        let entries =
            self.entries.lock().map_err(|_| StoreError::Read("lock poisoned".to_owned()))?;
        Ok(collect_prefix(&entries, prefix))
    }
}

/// Write the store atomically (unique temp file + rename).
fn save(path: &Path, entries: &BTreeMap<KvKey, String>) -> Result<(), StoreError> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let persisted = PersistedStore {
        entries: entries
            .iter()
            .map(|(k, v)| PersistedEntry { key: k.clone(), value: v.clone() })
            .collect(),
    };
    let json =
        serde_json::to_string_pretty(&persisted).map_err(|e| StoreError::Write(e.to_string()))?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)
        .map_err(|e| StoreError::Write(format!("{}: {e}", tmp_path.display())))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| StoreError::Write(format!("{}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
