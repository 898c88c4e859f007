//! File-backed KeyValueStore
//!
//! All keys live in one JSON object file. Every write replaces the file
//! through a temp file and rename, so a failed write leaves the previous
//! contents in place.
//!
//! The store keeps its own copy of the file, so only one process may have it
//! open. An exclusive lock on `store.json.lock` is taken at open and held
//! until the store is dropped; a second process gets an error instead of a
//! stale view.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use callboard::{DomainError, KeyValueStore};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    // Unlocked when the handle closes
    _lock: File,
}

impl JsonFileStore {
    /// Open (or start) the store at `path`, creating its directory.
    /// Fails if another process holds the store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        }

        let lock = acquire_lock(&path)?;

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse store {:?}", path))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store {:?}", path));
            }
        };

        tracing::debug!("Opened store {:?}", path);

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            _lock: lock,
        })
    }

    async fn write_through(
        &self,
        entries: &mut BTreeMap<String, String>,
        next: BTreeMap<String, String>,
    ) -> Result<(), DomainError> {
        let content = serde_json::to_string_pretty(&next)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| DomainError::persistence(format!("write {:?}: {}", tmp, e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(DomainError::persistence(format!(
                "replace {:?}: {}",
                self.path, e
            )));
        }

        *entries = next;
        Ok(())
    }
}

fn acquire_lock(path: &Path) -> Result<File> {
    let lock_path = path.with_extension("json.lock");
    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

    match lock.try_lock_exclusive() {
        Ok(()) => Ok(lock),
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => bail!(
            "Store {:?} is in use by another callboard process; close it and try again",
            path
        ),
        Err(e) => Err(e).with_context(|| format!("Failed to lock {:?}", lock_path)),
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_through(&mut entries, next).await
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write_through(&mut entries, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.get("records").await.unwrap(), None);
        store.set("records", "[]").await.unwrap();
        store.set("auto_reset_enabled", "false").await.unwrap();
        store.remove("auto_reset_enabled").await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("records").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("auto_reset_enabled").await.unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.set("records", "[1]").await.unwrap();

        // A directory in the temp file's place makes the write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(matches!(
            store.set("records", "[2]").await,
            Err(DomainError::Persistence(_))
        ));
        assert_eq!(store.get("records").await.unwrap().as_deref(), Some("[1]"));
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("records").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_second_open_is_refused_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let console = JsonFileStore::open(&path).await.unwrap();
        console.set("records", "[\"a\"]").await.unwrap();

        let err = JsonFileStore::open(&path).await.err().unwrap();
        assert!(err.to_string().contains("in use"));

        // The holder's view is untouched and the lock goes with it
        drop(console);
        let next = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(next.get("records").await.unwrap().as_deref(), Some("[\"a\"]"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(JsonFileStore::open(&path).await.is_err());
    }
}
