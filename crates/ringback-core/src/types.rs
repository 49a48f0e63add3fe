//! Data model — contacts, scheduled calls, and the notification boundary types.
//!
//! Field names on the wire are camelCase so that snapshots written by earlier
//! app builds (`{"id","contact":{"name","phoneNumber"},"date"}`) still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person to call. `phone_number` is empty when the directory entry had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub phone_number: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Build a contact from a directory entry, keeping only its first number.
    pub fn from_entry(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            phone_number: entry
                .phone_numbers
                .first()
                .map(|p| p.number.clone())
                .unwrap_or_default(),
        }
    }

    /// Whether there is a dialable number (non-blank).
    pub fn has_phone_number(&self) -> bool {
        !self.phone_number.trim().is_empty()
    }
}

/// A persisted reminder pairing a contact with the instant it should fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCall {
    /// Unique ID, the only identity and deletion key.
    pub id: String,
    pub contact: Contact,
    /// Absolute fire time.
    #[serde(rename = "date", alias = "scheduledAt")]
    pub scheduled_at: DateTime<Utc>,
    /// Platform trigger armed for this call, used to cancel it on delete.
    /// Absent on records written before triggers were tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<TriggerId>,
}

impl ScheduledCall {
    /// The payload the notification carries back on tap.
    pub fn payload(&self) -> NotificationPayload {
        NotificationPayload {
            phone_number: self.contact.phone_number.clone(),
        }
    }
}

/// Opaque identifier the notification subsystem hands back when arming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(pub String);

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data round-tripped through the notification from schedule time to tap time.
/// The phone number travels only through here, so the shape must stay `{"phoneNumber"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub phone_number: String,
}

/// Outbound "arm a trigger" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub fire_at: DateTime<Utc>,
}

/// A contact directory entry as the platform returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: String,
}

/// Permission state reported by a platform collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::Undetermined => write!(f, "undetermined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alice_call() -> ScheduledCall {
        ScheduledCall {
            id: "call-1".into(),
            contact: Contact::new("Alice", "555-1234"),
            scheduled_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            trigger_id: Some(TriggerId("trg-1".into())),
        }
    }

    #[test]
    fn test_record_roundtrip() {
        let call = alice_call();
        let json = serde_json::to_string(&call).unwrap();
        let back: ScheduledCall = serde_json::from_str(&json).unwrap();
        assert_eq!(back, call);
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(alice_call()).unwrap();
        assert_eq!(value["contact"]["phoneNumber"], "555-1234");
        assert_eq!(value["date"], "2025-01-01T10:00:00Z");
        assert_eq!(value["triggerId"], "trg-1");
    }

    #[test]
    fn test_legacy_record_without_trigger() {
        let json = r#"{"contact":{"name":"Bob","phoneNumber":"555-0000"},
                       "date":"2025-03-04T05:06:07.000Z","id":"1735725600000"}"#;
        let call: ScheduledCall = serde_json::from_str(json).unwrap();
        assert_eq!(call.id, "1735725600000");
        assert!(call.trigger_id.is_none());
        assert_eq!(
            call.scheduled_at,
            Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
        );
    }

    #[test]
    fn test_scheduled_at_alias() {
        let json = r#"{"id":"x","contact":{"name":"C","phoneNumber":"1"},
                       "scheduledAt":"2025-01-01T12:00:00+02:00"}"#;
        let call: ScheduledCall = serde_json::from_str(json).unwrap();
        assert_eq!(
            call.scheduled_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_payload_shape() {
        let payload = alice_call().payload();
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"phoneNumber":"555-1234"}"#
        );
    }

    #[test]
    fn test_contact_from_entry_takes_first_number() {
        let entry = DirectoryEntry {
            name: "Dana".into(),
            phone_numbers: vec![
                PhoneNumber { number: "111".into() },
                PhoneNumber { number: "222".into() },
            ],
        };
        assert_eq!(Contact::from_entry(&entry).phone_number, "111");

        let empty = DirectoryEntry {
            name: "Eve".into(),
            phone_numbers: vec![],
        };
        let contact = Contact::from_entry(&empty);
        assert_eq!(contact.phone_number, "");
        assert!(!contact.has_phone_number());
    }
}
