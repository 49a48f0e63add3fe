//! # Ringback Scheduler
//!
//! Scheduled-call lifecycle: create, persist, list, trigger and remove call
//! reminders, keeping the stored records in step with armed notifications.
//!
//! ## Architecture
//! ```text
//! CallScheduler.schedule_call(contact, at)
//!   ├── NotificationService.arm(title, body, {phoneNumber}, at) → TriggerId
//!   └── RecordStore.append(ScheduledCall { id, contact, date, triggerId })
//!
//! LifecycleViewModel
//!   ├── refresh()      → RecordStore.load()   (read errors → empty + warning)
//!   ├── delete_call()  → RecordStore.remove() → NotificationService.cancel()
//!   └── is_callable()  → 5-minute grace window
//!
//! TapRouter (one per process)
//!   └── deliver({phoneNumber}) → DialOnTap → Dialer.dial()
//!
//! watch::fire_due (CLI)  → presents due triggers; only a tap dials
//! ```

pub mod app;
pub mod contacts;
pub mod dialer;
pub mod file_lock;
pub mod kv;
pub mod lifecycle;
pub mod local_notify;
pub mod scheduler;
pub mod store;
pub mod tap;
pub mod watch;

pub use app::RingbackApp;
pub use lifecycle::{CallList, CallRow, LifecycleViewModel, is_callable};
pub use scheduler::{CallScheduler, SchedulingError};
pub use store::{KeyLocks, RecordStore, StoreError};
pub use tap::{DialOnTap, TapHandler, TapRouter};
