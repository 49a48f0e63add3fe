//! Notification tap routing.
//!
//! The platform delivers tapped-notification payloads to exactly one handler
//! for the whole process. [`TapRouter`] is that slot, made explicit: build it
//! once at startup, `install` a handler, `teardown` on shutdown.

use std::sync::{Arc, RwLock};

use ringback_core::config::PresentationConfig;
use ringback_core::traits::Dialer;
use ringback_core::NotificationPayload;
use thiserror::Error;

/// Receives tapped-notification payloads.
pub trait TapHandler: Send + Sync {
    fn on_notification_tapped(&self, payload: &NotificationPayload);
}

/// Dials the payload's number when a reminder is tapped.
pub struct DialOnTap {
    dialer: Arc<dyn Dialer>,
    auto_dial: bool,
}

impl DialOnTap {
    pub fn new(dialer: Arc<dyn Dialer>, auto_dial: bool) -> Self {
        Self { dialer, auto_dial }
    }
}

impl TapHandler for DialOnTap {
    fn on_notification_tapped(&self, payload: &NotificationPayload) {
        let number = payload.phone_number.trim();
        if number.is_empty() {
            tracing::debug!("Tapped reminder carried no phone number");
            return;
        }
        if !self.auto_dial {
            tracing::info!("📵 Reminder tapped, auto-dial disabled");
            return;
        }
        tracing::info!("📞 Reminder tapped, dialing {}", number);
        self.dialer.dial(number);
    }
}

#[derive(Debug, Error)]
pub enum TapRouterError {
    #[error("a tap handler is already installed")]
    AlreadyInstalled,

    #[error("invalid notification payload: {0}")]
    InvalidPayload(String),
}

/// Process-wide tap handler slot plus foreground presentation policy.
pub struct TapRouter {
    presentation: PresentationConfig,
    handler: RwLock<Option<Arc<dyn TapHandler>>>,
}

impl TapRouter {
    pub fn new(presentation: PresentationConfig) -> Self {
        Self {
            presentation,
            handler: RwLock::new(None),
        }
    }

    /// How notifications are shown while the app is in the foreground.
    pub fn presentation(&self) -> PresentationConfig {
        self.presentation
    }

    /// Install the tap handler. Fails if one is already installed.
    pub fn install(&self, handler: Arc<dyn TapHandler>) -> Result<(), TapRouterError> {
        let mut slot = self.handler.write().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Err(TapRouterError::AlreadyInstalled);
        }
        *slot = Some(handler);
        tracing::debug!("Tap handler installed");
        Ok(())
    }

    /// Remove the installed handler. Returns whether one was installed.
    pub fn teardown(&self) -> bool {
        let mut slot = self.handler.write().unwrap_or_else(|e| e.into_inner());
        let had = slot.take().is_some();
        if had {
            tracing::debug!("Tap handler removed");
        }
        had
    }

    pub fn is_installed(&self) -> bool {
        self.handler
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Route a tap to the installed handler. Returns false when none is installed.
    pub fn deliver(&self, payload: &NotificationPayload) -> bool {
        let handler = self
            .handler
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match handler {
            Some(h) => {
                h.on_notification_tapped(payload);
                true
            }
            None => {
                tracing::warn!("⚠️ Notification tapped but no handler is installed");
                false
            }
        }
    }

    /// Route a raw JSON payload as delivered by the platform.
    pub fn deliver_json(&self, raw: &str) -> Result<bool, TapRouterError> {
        let payload: NotificationPayload = serde_json::from_str(raw)
            .map_err(|e| TapRouterError::InvalidPayload(e.to_string()))?;
        Ok(self.deliver(&payload))
    }
}
