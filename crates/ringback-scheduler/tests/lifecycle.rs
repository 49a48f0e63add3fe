//! End-to-end scheduling scenarios across the scheduler, store and view model.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use ringback_core::config::{PresentationConfig, ReminderConfig};
use ringback_core::traits::Dialer;
use ringback_core::Contact;
use ringback_scheduler::kv::MemoryKvStore;
use ringback_scheduler::local_notify::LocalNotifier;
use ringback_scheduler::watch::fire_due;
use ringback_scheduler::{CallScheduler, LifecycleViewModel, RecordStore, TapRouter};

#[derive(Default)]
struct RecordingDialer {
    dialed: Mutex<Vec<String>>,
}

impl Dialer for RecordingDialer {
    fn dial(&self, phone_number: &str) {
        self.dialed.lock().unwrap().push(phone_number.to_string());
    }
}

struct Harness {
    dir: PathBuf,
    store: Arc<RecordStore>,
    notifier: Arc<LocalNotifier>,
    dialer: Arc<RecordingDialer>,
    scheduler: CallScheduler,
    vm: LifecycleViewModel,
}

impl Harness {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("ringback-it-{name}"));
        std::fs::remove_dir_all(&dir).ok();
        let kv = Arc::new(MemoryKvStore::new());
        let store = Arc::new(RecordStore::new(kv, "scheduledCalls"));
        let notifier = Arc::new(LocalNotifier::new(&dir).unwrap());
        let dialer = Arc::new(RecordingDialer::default());
        let reminder = ReminderConfig::default();
        let scheduler = CallScheduler::new(notifier.clone(), store.clone(), reminder.clone());
        let vm =
            LifecycleViewModel::new(store.clone(), notifier.clone(), dialer.clone(), &reminder);
        Self {
            dir,
            store,
            notifier,
            dialer,
            scheduler,
            vm,
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn schedule_then_delete_single_call() {
    let mut h = Harness::new("alice");
    let alice = Contact::new("Alice", "555-1234");

    let call = h.scheduler.schedule_call(alice.clone(), at(10)).await.unwrap();

    let stored = h.store.load().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].contact, alice);
    assert_eq!(stored[0].scheduled_at, at(10));
    assert_eq!(h.notifier.pending().await.unwrap().len(), 1);

    let remaining = h.vm.delete_call(&call.id).await.unwrap();
    assert!(remaining.is_empty());
    assert!(h.store.load().await.unwrap().is_empty());
    // The armed reminder went away with the record.
    assert!(h.notifier.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_one_call_leaves_the_other_intact() {
    let mut h = Harness::new("bob-carol");
    let bob = h
        .scheduler
        .schedule_call(Contact::new("Bob", "555-0001"), at(9))
        .await
        .unwrap();
    let carol = h
        .scheduler
        .schedule_call(Contact::new("Carol", "555-0002"), at(15))
        .await
        .unwrap();

    let list = h.vm.refresh().await;
    assert_eq!(list.calls, vec![bob.clone(), carol.clone()]);

    h.vm.delete_call(&bob.id).await.unwrap();
    assert_eq!(h.store.load().await.unwrap(), vec![carol.clone()]);

    let pending = h.notifier.pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(Some(&pending[0].id), carol.trigger_id.as_ref());
}

#[tokio::test]
async fn fired_reminder_dials_contact_only_when_tapped() {
    let h = Harness::new("tap");
    h.scheduler
        .schedule_call(Contact::new("Alice", "555-1234"), at(10))
        .await
        .unwrap();

    let router = TapRouter::new(PresentationConfig::default());
    router.install(h.vm.tap_handler()).unwrap();
    let presentation = router.presentation();

    assert!(fire_due(&h.notifier, presentation, at(9)).await.unwrap().is_empty());
    let fired = fire_due(&h.notifier, presentation, at(10)).await.unwrap();
    assert_eq!(fired.len(), 1);
    assert!(h.dialer.dialed.lock().unwrap().is_empty());

    assert!(router.deliver(&fired[0].payload));
    assert_eq!(*h.dialer.dialed.lock().unwrap(), vec!["555-1234".to_string()]);

    // Firing leaves the record in place until the user deletes it.
    assert_eq!(h.store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_number_leaves_store_untouched() {
    let h = Harness::new("missing");
    let before = h.store.load().await.unwrap();
    assert!(h
        .scheduler
        .schedule_call(Contact::new("Nobody", ""), at(10))
        .await
        .is_err());
    assert_eq!(h.store.load().await.unwrap(), before);
    assert!(h.notifier.pending().await.unwrap().is_empty());
}
