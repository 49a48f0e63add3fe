//! Local notification backend — armed triggers kept in a JSON file.
//! Used by the CLI, where there is no OS notification center to hand off to.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ringback_core::error::{Result, RingbackError};
use ringback_core::traits::NotificationService;
use ringback_core::{NotificationPayload, TriggerId, TriggerRequest};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::file_lock::{self, FileLock};

/// A trigger waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmedTrigger {
    pub id: TriggerId,
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub fire_at: DateTime<Utc>,
    pub armed_at: DateTime<Utc>,
}

/// File-backed trigger table (`triggers.json`). Every read-modify-write holds
/// `.triggers.lock`, so a watcher and a scheduler in separate processes can
/// share one directory.
pub struct LocalNotifier {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Mutex<()>,
}

/// Held for the duration of one table update.
struct TableGuard<'a> {
    _local: MutexGuard<'a, ()>,
    _file: FileLock,
}

impl LocalNotifier {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join("triggers.json"),
            lock_path: dir.join(".triggers.lock"),
            lock: Mutex::new(()),
        })
    }

    /// All armed triggers, soonest first.
    pub async fn pending(&self) -> Result<Vec<ArmedTrigger>> {
        let _guard = self.lock_table().await?;
        let mut triggers = self.read().await?;
        triggers.sort_by_key(|t| t.fire_at);
        Ok(triggers)
    }

    /// Remove and return every trigger due at `now` (fire_at <= now).
    pub async fn take_due(&self, now: DateTime<Utc>) -> Result<Vec<ArmedTrigger>> {
        let _guard = self.lock_table().await?;
        let triggers = self.read().await?;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            triggers.into_iter().partition(|t| t.fire_at <= now);
        if !due.is_empty() {
            self.write(&waiting).await?;
            due.sort_by_key(|t| t.fire_at);
        }
        Ok(due)
    }

    async fn lock_table(&self) -> Result<TableGuard<'_>> {
        let local = self.lock.lock().await;
        let file = FileLock::exclusive(self.lock_path.clone())
            .await
            .map_err(|e| RingbackError::Notification(format!("lock trigger table: {e}")))?;
        Ok(TableGuard {
            _local: local,
            _file: file,
        })
    }

    async fn read(&self) -> Result<Vec<ArmedTrigger>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                RingbackError::Notification(format!("corrupt trigger table: {e}"))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, triggers: &[ArmedTrigger]) -> Result<()> {
        let json = serde_json::to_string_pretty(triggers)?;
        let tmp = file_lock::temp_path(&self.path);
        let written = match tokio::fs::write(&tmp, json).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if written.is_err() {
            tokio::fs::remove_file(&tmp).await.ok();
        }
        written?;
        Ok(())
    }
}

#[async_trait]
impl NotificationService for LocalNotifier {
    fn name(&self) -> &str {
        "local"
    }

    async fn arm(&self, request: TriggerRequest) -> Result<TriggerId> {
        let _guard = self.lock_table().await?;
        let mut triggers = self.read().await?;
        let id = TriggerId(format!("ltrg-{}", uuid::Uuid::new_v4().simple()));
        triggers.push(ArmedTrigger {
            id: id.clone(),
            title: request.title,
            body: request.body,
            payload: request.payload,
            fire_at: request.fire_at,
            armed_at: Utc::now(),
        });
        self.write(&triggers).await?;
        tracing::debug!("⏰ Armed {} for {}", id, request.fire_at.to_rfc3339());
        Ok(id)
    }

    async fn cancel(&self, id: &TriggerId) -> Result<()> {
        let _guard = self.lock_table().await?;
        let mut triggers = self.read().await?;
        let before = triggers.len();
        triggers.retain(|t| &t.id != id);
        if triggers.len() < before {
            self.write(&triggers).await?;
            tracing::debug!("🔕 Cancelled {}", id);
        }
        Ok(())
    }
}
