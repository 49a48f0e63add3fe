//! Call scheduler — arms the reminder, then persists the record.
//!
//! Ordering matters: the trigger is armed first so the store never holds a
//! call without a live notification. If the write then fails, the caller gets
//! [`SchedulingError::PartialFailure`] carrying the record, which it can hand
//! back to [`CallScheduler::retry_persist`] without arming a second notification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ringback_core::config::ReminderConfig;
use ringback_core::traits::NotificationService;
use ringback_core::{Contact, ScheduledCall, TriggerRequest};
use thiserror::Error;

use crate::store::{RecordStore, StoreError};

/// Scheduling failures.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Contact has no number to dial. Nothing was armed or stored.
    #[error("contact '{name}' has no phone number")]
    MissingPhoneNumber { name: String },

    /// The notification subsystem refused the trigger. Nothing was stored.
    #[error("failed to arm reminder: {0}")]
    NotificationArm(String),

    /// Reminder armed, record not stored.
    #[error("reminder armed but call {} was not saved", .record.id)]
    PartialFailure {
        record: Box<ScheduledCall>,
        #[source]
        source: StoreError,
    },
}

/// Creates scheduled calls.
pub struct CallScheduler {
    notifier: Arc<dyn NotificationService>,
    store: Arc<RecordStore>,
    reminder: ReminderConfig,
}

impl CallScheduler {
    pub fn new(
        notifier: Arc<dyn NotificationService>,
        store: Arc<RecordStore>,
        reminder: ReminderConfig,
    ) -> Self {
        Self {
            notifier,
            store,
            reminder,
        }
    }

    /// Schedule a reminder to call `contact` at `at`.
    ///
    /// Times in the past are accepted as-is; the notification subsystem decides
    /// whether they fire immediately.
    pub async fn schedule_call(
        &self,
        contact: Contact,
        at: DateTime<Utc>,
    ) -> Result<ScheduledCall, SchedulingError> {
        if !contact.has_phone_number() {
            tracing::warn!("⚠️ Cannot schedule call for '{}': no phone number", contact.name);
            return Err(SchedulingError::MissingPhoneNumber { name: contact.name });
        }

        let mut record = ScheduledCall {
            id: new_call_id(),
            contact,
            scheduled_at: at,
            trigger_id: None,
        };
        let request = TriggerRequest {
            title: self.reminder.title.clone(),
            body: self.reminder.body_for(&record.contact.name),
            payload: record.payload(),
            fire_at: at,
        };

        let trigger_id = self
            .notifier
            .arm(request)
            .await
            .map_err(|e| SchedulingError::NotificationArm(e.to_string()))?;
        tracing::debug!("🔔 Armed trigger {} via {}", trigger_id, self.notifier.name());
        record.trigger_id = Some(trigger_id);

        match self.store.append(record.clone()).await {
            Ok(()) => {
                tracing::info!(
                    "📅 Call scheduled: '{}' at {} ({})",
                    record.contact.name,
                    record.scheduled_at.to_rfc3339(),
                    record.id
                );
                Ok(record)
            }
            Err(source) => {
                tracing::warn!("⚠️ Reminder armed but call {} not saved: {source}", record.id);
                Err(SchedulingError::PartialFailure {
                    record: Box::new(record),
                    source,
                })
            }
        }
    }

    /// Re-attempt persisting a partially scheduled call. Does not re-arm.
    pub async fn retry_persist(
        &self,
        record: &ScheduledCall,
    ) -> Result<ScheduledCall, StoreError> {
        self.store.append(record.clone()).await?;
        tracing::info!("📅 Call {} saved on retry", record.id);
        Ok(record.clone())
    }
}

fn new_call_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
