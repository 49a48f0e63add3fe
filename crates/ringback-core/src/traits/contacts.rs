//! Contact directory.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DirectoryEntry, PermissionStatus};

/// Read-only source of contacts.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    fn name(&self) -> &str;

    async fn list_contacts(&self) -> Result<Vec<DirectoryEntry>>;

    async fn permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }
}
