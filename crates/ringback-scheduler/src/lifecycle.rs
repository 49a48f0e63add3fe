//! Lifecycle view model — what the scheduled-calls screen renders and does.
//!
//! Holds a cached copy of the snapshot for display. The cache is only replaced
//! with what the store returned, so a failed delete keeps the row visible.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use ringback_core::config::ReminderConfig;
use ringback_core::traits::{Dialer, NotificationService};
use ringback_core::{NotificationPayload, ScheduledCall};

use crate::store::{RecordStore, StoreError};
use crate::tap::{DialOnTap, TapHandler};

/// How long after its time a call can still be dialed from the list.
pub const GRACE_WINDOW_SECS: i64 = 5 * 60;

/// False once `now` is more than the grace window past `scheduled_at`.
/// Exactly at the boundary the call is still callable.
pub fn is_callable(record: &ScheduledCall, now: DateTime<Utc>) -> bool {
    now - record.scheduled_at <= Duration::seconds(GRACE_WINDOW_SECS)
}

/// Result of a refresh. A read failure shows up as an empty list plus warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallList {
    pub calls: Vec<ScheduledCall>,
    pub warning: Option<String>,
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRow {
    pub call: ScheduledCall,
    pub callable: bool,
}

pub struct LifecycleViewModel {
    store: Arc<RecordStore>,
    notifier: Arc<dyn NotificationService>,
    dialer: Arc<dyn Dialer>,
    tap: Arc<DialOnTap>,
    calls: Vec<ScheduledCall>,
}

impl LifecycleViewModel {
    pub fn new(
        store: Arc<RecordStore>,
        notifier: Arc<dyn NotificationService>,
        dialer: Arc<dyn Dialer>,
        reminder: &ReminderConfig,
    ) -> Self {
        let tap = Arc::new(DialOnTap::new(dialer.clone(), reminder.auto_dial_on_tap));
        Self {
            store,
            notifier,
            dialer,
            tap,
            calls: Vec::new(),
        }
    }

    /// Cached calls from the last successful store operation.
    pub fn calls(&self) -> &[ScheduledCall] {
        &self.calls
    }

    /// Reload from the store. Never fails; read errors degrade to an empty list.
    pub async fn refresh(&mut self) -> CallList {
        match self.store.load().await {
            Ok(calls) => {
                tracing::debug!("Loaded {} scheduled calls", calls.len());
                self.calls = calls.clone();
                CallList {
                    calls,
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to load scheduled calls: {e}");
                self.calls.clear();
                CallList {
                    calls: Vec::new(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// Delete a call and cancel its reminder.
    ///
    /// The cache is untouched if the store write fails. Cancelling happens after
    /// the record is gone; a cancel failure is logged, not returned.
    pub async fn delete_call(&mut self, id: &str) -> Result<Vec<ScheduledCall>, StoreError> {
        let removed = self
            .store
            .load()
            .await
            .ok()
            .and_then(|calls| calls.into_iter().find(|c| c.id == id))
            .or_else(|| self.calls.iter().find(|c| c.id == id).cloned());

        let remaining = self.store.remove(id).await?;
        self.calls = remaining.clone();

        if let Some(trigger_id) = removed.and_then(|c| c.trigger_id) {
            match self.notifier.cancel(&trigger_id).await {
                Ok(()) => tracing::debug!("🔕 Cancelled trigger {trigger_id}"),
                Err(e) => tracing::warn!(
                    "⚠️ Call {id} deleted but trigger {trigger_id} not cancelled: {e}"
                ),
            }
        }
        tracing::info!("🗑️ Call deleted: {id}");
        Ok(remaining)
    }

    pub fn is_callable(&self, record: &ScheduledCall, now: DateTime<Utc>) -> bool {
        is_callable(record, now)
    }

    /// Rows for rendering, callability evaluated against `now`.
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<CallRow> {
        self.calls
            .iter()
            .map(|call| CallRow {
                call: call.clone(),
                callable: is_callable(call, now),
            })
            .collect()
    }

    /// Manual "call" button. Dials only if the call is still callable.
    /// Returns whether the dialer was invoked.
    pub fn call_now(&self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(call) = self.calls.iter().find(|c| c.id == id) else {
            tracing::debug!("Call {id} is not in the list");
            return false;
        };
        if !is_callable(call, now) {
            tracing::debug!("Call {} is past its grace window", call.id);
            return false;
        }
        if !call.contact.has_phone_number() {
            tracing::warn!("⚠️ Call {} has no phone number to dial", call.id);
            return false;
        }
        tracing::info!("📞 Calling {} ({})", call.contact.name, call.contact.phone_number);
        self.dialer.dial(&call.contact.phone_number);
        true
    }

    /// Route a tapped reminder to the dialer.
    pub fn on_notification_tapped(&self, payload: &NotificationPayload) {
        self.tap.on_notification_tapped(payload);
    }

    /// Handler to install on the process-wide tap router.
    pub fn tap_handler(&self) -> Arc<dyn TapHandler> {
        self.tap.clone()
    }
}
