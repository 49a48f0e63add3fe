//! Contact picking on top of a [`ContactDirectory`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ringback_core::error::{Result, RingbackError};
use ringback_core::traits::ContactDirectory;
use ringback_core::{Contact, DirectoryEntry};

/// Directory read from a JSON file of `[{"name", "phoneNumbers": [{"number"}]}]`.
pub struct JsonContactDirectory {
    path: PathBuf,
}

impl JsonContactDirectory {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ContactDirectory for JsonContactDirectory {
    fn name(&self) -> &str {
        "json"
    }

    async fn list_contacts(&self) -> Result<Vec<DirectoryEntry>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("⚠️ No contacts file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json).map_err(|e| {
            RingbackError::Contacts(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }
}

/// Resolve the entry at `index` to a contact (first number only).
pub fn pick(entries: &[DirectoryEntry], index: usize) -> Option<Contact> {
    entries.get(index).map(Contact::from_entry)
}

/// Number as shown in the picker.
pub fn display_number(contact: &Contact) -> &str {
    if contact.has_phone_number() {
        &contact.phone_number
    } else {
        "No number"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTACTS: &str = r#"[
        {"name": "Alice", "phoneNumbers": [{"number": "555-1234"}, {"number": "555-9999"}]},
        {"name": "Nobody"}
    ]"#;

    #[tokio::test]
    async fn test_json_directory_and_pick() {
        let dir = std::env::temp_dir().join("ringback-test-contacts");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("contacts.json");
        std::fs::write(&path, CONTACTS).unwrap();

        let entries = JsonContactDirectory::new(&path).list_contacts().await.unwrap();
        assert_eq!(entries.len(), 2);

        let alice = pick(&entries, 0).unwrap();
        assert_eq!(alice, Contact::new("Alice", "555-1234"));
        assert_eq!(display_number(&alice), "555-1234");

        let nobody = pick(&entries, 1).unwrap();
        assert_eq!(nobody.phone_number, "");
        assert_eq!(display_number(&nobody), "No number");

        assert!(pick(&entries, 2).is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("ringback-test-no-such-contacts.json");
        let entries = JsonContactDirectory::new(&path).list_contacts().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_contacts_error() {
        let dir = std::env::temp_dir().join("ringback-test-contacts-bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("contacts.json");
        std::fs::write(&path, "{").unwrap();
        let err = JsonContactDirectory::new(&path).list_contacts().await.unwrap_err();
        assert!(matches!(err, RingbackError::Contacts(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
