//! # Ringback Core
//!
//! Shared data model, configuration, error types and the platform traits
//! (key-value persistence, notifications, dialer, contact directory) that the
//! scheduler crate is written against.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::RingbackConfig;
pub use error::{Result, RingbackError};
pub use types::{
    Contact, DirectoryEntry, NotificationPayload, PermissionStatus, PhoneNumber, ScheduledCall,
    TriggerId, TriggerRequest,
};
