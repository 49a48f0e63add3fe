//! Local notification subsystem.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PermissionStatus, TriggerId, TriggerRequest};

/// Arms and cancels time-based notifications.
///
/// Delivery is at-least-once, at or after `fire_at`, never before. Taps come back
/// through the tap router, not through this trait.
#[async_trait]
pub trait NotificationService: Send + Sync {
    fn name(&self) -> &str;

    /// Arm a trigger. Returns the platform's identifier for it.
    async fn arm(&self, request: TriggerRequest) -> Result<TriggerId>;

    /// Cancel a previously armed trigger. Unknown ids are not an error.
    async fn cancel(&self, id: &TriggerId) -> Result<()>;

    /// Current notification permission.
    async fn permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }
}
