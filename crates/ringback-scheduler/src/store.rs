//! Record store — the persisted snapshot of scheduled calls.
//!
//! The whole snapshot lives under one key as a JSON array and every mutation
//! rewrites it. Mutations on a key go through a single-writer lock from
//! [`KeyLocks`] plus the backend's own key lock, so concurrent append/remove
//! never lose an update, in this process or another one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use ringback_core::traits::{KeyGuard, KeyValueStore};
use ringback_core::ScheduledCall;
use thiserror::Error;
use tokio::sync::Mutex;

/// Record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot could not be read or does not match the record schema.
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Snapshot could not be written back.
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// A different record already uses this id.
    #[error("a different call with id '{id}' is already stored")]
    DuplicateId { id: String },
}

impl StoreError {
    pub fn is_read(&self) -> bool {
        matches!(self, StoreError::Read { .. })
    }
}

/// Per-key write locks. Stores sharing one `KeyLocks` serialize their writes.
#[derive(Debug, Default, Clone)]
pub struct KeyLocks {
    locks: Arc<std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock guarding `key`. Created on first use.
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Scheduled-call store backed by a [`KeyValueStore`].
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Create a store with its own lock registry.
    pub fn new(kv: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self::with_locks(kv, key, &KeyLocks::new())
    }

    /// Create a store whose writes are serialized with every other store built
    /// from the same `locks` on the same key.
    pub fn with_locks(kv: Arc<dyn KeyValueStore>, key: &str, locks: &KeyLocks) -> Self {
        Self {
            kv,
            key: key.to_string(),
            write_lock: locks.lock_for(key),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the current snapshot. Missing key → empty.
    pub async fn load(&self) -> Result<Vec<ScheduledCall>, StoreError> {
        let raw = self.kv.get(&self.key).await.map_err(|e| self.read_err(e))?;
        match raw {
            Some(json) => self.parse(&json),
            None => Ok(Vec::new()),
        }
    }

    /// Look up a single call by id.
    pub async fn get(&self, id: &str) -> Result<Option<ScheduledCall>, StoreError> {
        Ok(self.load().await?.into_iter().find(|c| c.id == id))
    }

    /// Append a record to the end of the snapshot.
    ///
    /// Re-appending an identical record is a no-op, so a persistence retry after
    /// an ambiguous failure cannot duplicate it.
    pub async fn append(&self, record: ScheduledCall) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let _key_guard = self.lock_key().await?;
        let mut calls = self.load().await?;

        if let Some(existing) = calls.iter().find(|c| c.id == record.id) {
            if *existing == record {
                tracing::debug!("Call {} already stored, skipping append", record.id);
                return Ok(());
            }
            return Err(StoreError::DuplicateId { id: record.id });
        }

        let id = record.id.clone();
        calls.push(record);
        self.write(&calls).await?;
        tracing::debug!(
            "💾 Appended call {} ({} stored via {})",
            id,
            calls.len(),
            self.kv.name()
        );
        Ok(())
    }

    /// Remove a record by id and return the new snapshot.
    /// An unknown id leaves the snapshot unchanged (but still rewrites it).
    pub async fn remove(&self, id: &str) -> Result<Vec<ScheduledCall>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let _key_guard = self.lock_key().await?;
        let mut calls = self.load().await?;
        let before = calls.len();
        calls.retain(|c| c.id != id);
        self.write(&calls).await?;
        if calls.len() < before {
            tracing::debug!("🗑️ Removed call {} ({} stored)", id, calls.len());
        } else {
            tracing::debug!("Remove of unknown call {} was a no-op", id);
        }
        Ok(calls)
    }

    async fn lock_key(&self) -> Result<KeyGuard, StoreError> {
        self.kv.lock(&self.key).await.map_err(|e| StoreError::Write {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    async fn write(&self, calls: &[ScheduledCall]) -> Result<(), StoreError> {
        let json = serde_json::to_string(calls).map_err(|e| StoreError::Write {
            key: self.key.clone(),
            reason: format!("serialize: {e}"),
        })?;
        self.kv
            .set(&self.key, json)
            .await
            .map_err(|e| StoreError::Write {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    fn parse(&self, json: &str) -> Result<Vec<ScheduledCall>, StoreError> {
        let calls: Vec<ScheduledCall> =
            serde_json::from_str(json).map_err(|e| self.read_err(e))?;

        let mut seen = HashSet::new();
        for (idx, call) in calls.iter().enumerate() {
            if call.id.trim().is_empty() {
                return Err(self.read_err(format!("record {idx} has an empty id")));
            }
            if !seen.insert(call.id.as_str()) {
                return Err(self.read_err(format!("id '{}' appears more than once", call.id)));
            }
        }
        Ok(calls)
    }

    fn read_err(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::Read {
            key: self.key.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use chrono::{TimeZone, Utc};
    use ringback_core::Contact;

    fn call(id: &str, name: &str, hour: u32) -> ScheduledCall {
        ScheduledCall {
            id: id.into(),
            contact: Contact::new(name, "555-0100"),
            scheduled_at: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
            trigger_id: None,
        }
    }

    fn store() -> (Arc<MemoryKvStore>, RecordStore) {
        let kv = Arc::new(MemoryKvStore::new());
        let store = RecordStore::new(kv.clone(), "scheduledCalls");
        (kv, store)
    }

    #[tokio::test]
    async fn test_load_missing_key_is_empty() {
        let (_, store) = store();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let (_, store) = store();
        let calls: Vec<_> = (0..5).map(|i| call(&format!("c{i}"), "X", i)).collect();
        for c in &calls {
            store.append(c.clone()).await.unwrap();
        }
        assert_eq!(store.load().await.unwrap(), calls);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_, store) = store();
        store.append(call("a", "A", 1)).await.unwrap();
        store.append(call("b", "B", 2)).await.unwrap();

        let first = store.remove("a").await.unwrap();
        let second = store.remove("a").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![call("b", "B", 2)]);
    }

    #[tokio::test]
    async fn test_remove_unknown_rewrites_unchanged() {
        let (kv, store) = store();
        let remaining = store.remove("nope").await.unwrap();
        assert!(remaining.is_empty());
        assert_eq!(kv.raw("scheduledCalls").as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_read_error() {
        let (kv, store) = store();
        kv.insert_raw("scheduledCalls", "{not json");
        let err = store.load().await.unwrap_err();
        assert!(err.is_read());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_read_error() {
        let (kv, store) = store();
        kv.insert_raw(
            "scheduledCalls",
            r#"[{"id":"1","contact":{"name":"A"},"date":"2025-01-01T00:00:00Z"}]"#,
        );
        assert!(store.load().await.unwrap_err().is_read());

        kv.insert_raw(
            "scheduledCalls",
            r#"[{"id":"1","contact":{"name":"A","phoneNumber":"1"},"date":"tomorrow"}]"#,
        );
        assert!(store.load().await.unwrap_err().is_read());
    }

    #[tokio::test]
    async fn test_empty_and_duplicate_ids_rejected() {
        let (kv, store) = store();
        let dup = serde_json::to_string(&vec![call("x", "A", 1), call("x", "B", 2)]).unwrap();
        kv.insert_raw("scheduledCalls", &dup);
        assert!(store.load().await.unwrap_err().is_read());

        let empty = serde_json::to_string(&vec![call(" ", "A", 1)]).unwrap();
        kv.insert_raw("scheduledCalls", &empty);
        assert!(store.load().await.unwrap_err().is_read());
    }

    #[tokio::test]
    async fn test_append_on_corrupt_snapshot_does_not_overwrite() {
        let (kv, store) = store();
        kv.insert_raw("scheduledCalls", "garbage");
        assert!(store.append(call("a", "A", 1)).await.is_err());
        assert_eq!(kv.raw("scheduledCalls").as_deref(), Some("garbage"));
    }

    #[tokio::test]
    async fn test_append_same_record_twice_is_noop() {
        let (_, store) = store();
        store.append(call("a", "A", 1)).await.unwrap();
        store.append(call("a", "A", 1)).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);

        let err = store.append(call("a", "Other", 3)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_is_write_error() {
        let (kv, store) = store();
        kv.fail_writes(true);
        let err = store.append(call("a", "A", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        kv.fail_writes(false);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_, store) = store();
        store.append(call("a", "A", 1)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().unwrap().contact.name, "A");
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let kv = Arc::new(MemoryKvStore::new());
        let locks = KeyLocks::new();
        let a = Arc::new(RecordStore::with_locks(kv.clone(), "k", &locks));
        let b = Arc::new(RecordStore::with_locks(kv.clone(), "k", &locks));

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let store = if i % 2 == 0 { a.clone() } else { b.clone() };
            handles.push(tokio::spawn(async move {
                store.append(call(&format!("c{i}"), "X", i % 24)).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(a.load().await.unwrap().len(), 20);
    }
}
