//! Application wiring — builds the components once at startup.

use std::path::Path;
use std::sync::Arc;

use ringback_core::error::{Result, RingbackError};
use ringback_core::traits::{ContactDirectory, NotificationService};
use ringback_core::{PermissionStatus, RingbackConfig};

use crate::contacts::JsonContactDirectory;
use crate::dialer::TelDialer;
use crate::kv::FileKvStore;
use crate::lifecycle::LifecycleViewModel;
use crate::local_notify::LocalNotifier;
use crate::scheduler::CallScheduler;
use crate::store::{KeyLocks, RecordStore};
use crate::tap::TapRouter;

/// Everything the CLI needs, wired to the local adapters.
pub struct RingbackApp {
    pub config: RingbackConfig,
    pub store: Arc<RecordStore>,
    pub notifier: Arc<LocalNotifier>,
    pub directory: Arc<JsonContactDirectory>,
    pub scheduler: CallScheduler,
    pub view_model: LifecycleViewModel,
    pub router: Arc<TapRouter>,
}

impl RingbackApp {
    /// Build the app and install the tap handler on the router.
    pub fn init(config: RingbackConfig, data_dir: &Path, contacts_file: &Path) -> Result<Self> {
        let kv = Arc::new(FileKvStore::new(data_dir)?);
        let locks = KeyLocks::new();
        let store = Arc::new(RecordStore::with_locks(kv, &config.storage.key, &locks));
        // Records live one file per key in `data_dir`; keys never map into a
        // subdirectory, so the trigger table cannot collide with a record key.
        let notifier = Arc::new(LocalNotifier::new(&data_dir.join("notifications"))?);
        let directory = Arc::new(JsonContactDirectory::new(contacts_file));
        let dialer = Arc::new(TelDialer::new(config.dialer.open_command.clone()));

        let scheduler =
            CallScheduler::new(notifier.clone(), store.clone(), config.reminder.clone());
        let view_model =
            LifecycleViewModel::new(store.clone(), notifier.clone(), dialer, &config.reminder);

        let router = Arc::new(TapRouter::new(config.presentation));
        router
            .install(view_model.tap_handler())
            .map_err(|e| RingbackError::Notification(e.to_string()))?;

        tracing::debug!(
            "Ringback ready: data in {}, key '{}'",
            data_dir.display(),
            store.key()
        );

        Ok(Self {
            config,
            store,
            notifier,
            directory,
            scheduler,
            view_model,
            router,
        })
    }

    /// Remove the tap handler.
    pub fn shutdown(&self) {
        self.router.teardown();
    }
}

/// Check notification and contact permissions. Returns a warning per missing grant.
pub async fn check_permissions(
    notifier: &dyn NotificationService,
    directory: &dyn ContactDirectory,
) -> Vec<String> {
    let mut warnings = Vec::new();

    match directory.permission().await {
        Ok(PermissionStatus::Granted) => {}
        Ok(status) => warnings.push(format!(
            "Contact permissions are required to use this app ({status})"
        )),
        Err(e) => warnings.push(format!("Could not check contact permissions: {e}")),
    }

    match notifier.permission().await {
        Ok(PermissionStatus::Granted) => {}
        Ok(status) => warnings.push(format!(
            "Notification permissions are required to use this app ({status})"
        )),
        Err(e) => warnings.push(format!("Could not check notification permissions: {e}")),
    }

    for w in &warnings {
        tracing::warn!("⚠️ {w}");
    }
    warnings
}
