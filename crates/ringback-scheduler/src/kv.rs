//! Key-value backends: a file-per-key store for the CLI and an in-memory map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ringback_core::error::{Result, RingbackError};
use ringback_core::traits::{KeyGuard, KeyValueStore};

use crate::file_lock::{self, FileLock};

/// File-based store — each key is a JSON file under one directory.
/// Writes land in a uniquely named temp file first and are renamed into place.
/// `lock` takes `.<key>.lock`, so processes sharing the directory serialize.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::file_stem(key)))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.lock", Self::file_stem(key)))
    }

    fn file_stem(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RingbackError::Storage(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key);
        let tmp = file_lock::temp_path(&path);
        if let Err(e) = tokio::fs::write(&tmp, value.as_bytes()).await {
            tokio::fs::remove_file(&tmp).await.ok();
            return Err(RingbackError::Storage(format!("write {}: {e}", tmp.display())));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            tokio::fs::remove_file(&tmp).await.ok();
            return Err(RingbackError::Storage(format!("rename {}: {e}", path.display())));
        }
        tracing::debug!("💾 Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn lock(&self, key: &str) -> Result<KeyGuard> {
        let path = self.lock_path_for(key);
        let lock = FileLock::exclusive(path.clone())
            .await
            .map_err(|e| RingbackError::Storage(format!("lock {}: {e}", path.display())))?;
        Ok(KeyGuard::new(lock))
    }
}

/// In-memory store. Writes can be made to fail, which lets callers exercise
/// their write-error paths.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current raw value for a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Put a raw value in place, bypassing any failure injection.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RingbackError::Storage(format!("write to '{key}' rejected")));
        }
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }
}
