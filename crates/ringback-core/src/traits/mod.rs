//! Platform collaborator traits. The scheduler crate only talks to the
//! outside world through these.

pub mod contacts;
pub mod dialer;
pub mod kv;
pub mod notifier;

pub use contacts::ContactDirectory;
pub use dialer::Dialer;
pub use kv::{KeyGuard, KeyValueStore};
pub use notifier::NotificationService;
