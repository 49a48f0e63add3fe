//! Ringback configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RingbackError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RingbackConfig {
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
    #[serde(default)]
    pub dialer: DialerConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

impl RingbackConfig {
    /// Load config from the default path (~/.ringback/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RingbackError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| RingbackError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| RingbackError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Ringback home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ringback")
    }
}

fn bool_true() -> bool { true }

/// Reminder content and tap behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// `{name}` is replaced with the contact's name.
    #[serde(default = "default_body_template")]
    pub body_template: String,
    /// Dial the contact when the reminder is tapped.
    #[serde(default = "bool_true")]
    pub auto_dial_on_tap: bool,
}

fn default_title() -> String { "Scheduled Call Reminder".into() }
fn default_body_template() -> String { "Time to call {name}".into() }

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            body_template: default_body_template(),
            auto_dial_on_tap: true,
        }
    }
}

impl ReminderConfig {
    /// Render the notification body for a contact.
    pub fn body_for(&self, name: &str) -> String {
        self.body_template.replace("{name}", name)
    }
}

/// Where records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Key holding the scheduled-call snapshot.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_data_dir() -> String { "~/.ringback/data".into() }
fn default_storage_key() -> String { "scheduledCalls".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_storage_key(),
        }
    }
}

/// How a notification is presented while the app is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "bool_true")]
    pub show_alert: bool,
    #[serde(default = "bool_true")]
    pub play_sound: bool,
    #[serde(default = "bool_true")]
    pub set_badge: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }
}

/// Contact directory source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    #[serde(default = "default_contacts_file")]
    pub file: String,
}

fn default_contacts_file() -> String { "~/.ringback/contacts.json".into() }

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            file: default_contacts_file(),
        }
    }
}

/// Dialer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialerConfig {
    /// External opener for `tel:` URIs (e.g. "xdg-open"). Log-only when unset.
    #[serde(default)]
    pub open_command: Option<String>,
}

/// Local trigger watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

fn default_check_interval() -> u64 { 15 }

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
        }
    }
}
