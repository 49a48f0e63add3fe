//! Trigger watcher — presents due local triggers the way a notification
//! center would. Dialing waits for a tap (`ringback tap`), never the firing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ringback_core::config::PresentationConfig;
use ringback_core::error::Result;

use crate::local_notify::{ArmedTrigger, LocalNotifier};

/// Present everything due at `now` and return what fired, soonest first.
pub async fn fire_due(
    notifier: &LocalNotifier,
    presentation: PresentationConfig,
    now: DateTime<Utc>,
) -> Result<Vec<ArmedTrigger>> {
    let due = notifier.take_due(now).await?;
    for trigger in &due {
        present(trigger, presentation);
    }
    if presentation.set_badge && !due.is_empty() {
        tracing::info!("🔴 Badge: {}", due.len());
    }
    Ok(due)
}

fn present(trigger: &ArmedTrigger, presentation: PresentationConfig) {
    if presentation.show_alert {
        tracing::info!("🔔 {}: {}", trigger.title, trigger.body);
    }
    if presentation.play_sound {
        tracing::debug!("🔊 Sound for {}", trigger.id);
    }
    tracing::info!("👉 Tap to call: ringback tap '{}'", trigger.payload.phone_number);
}

/// Run the watcher loop until the task is dropped.
pub async fn run_watcher(
    notifier: Arc<LocalNotifier>,
    presentation: PresentationConfig,
    check_interval_secs: u64,
) {
    tracing::info!(
        "⏰ Reminder watcher started (check every {}s)",
        check_interval_secs
    );

    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(check_interval_secs.max(1)));

    loop {
        interval.tick().await;
        match fire_due(&notifier, presentation, Utc::now()).await {
            Ok(fired) if fired.is_empty() => {}
            Ok(fired) => tracing::info!("📣 {} reminder(s) fired", fired.len()),
            Err(e) => tracing::warn!("⚠️ Failed to check triggers: {e}"),
        }
    }
}
