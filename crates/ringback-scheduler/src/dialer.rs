//! `tel:` dialer — logs the URI and optionally hands it to an opener command.

use ringback_core::traits::Dialer;

/// Build the `tel:` URI for a number, dropping spaces.
pub fn tel_uri(phone_number: &str) -> String {
    let number: String = phone_number.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{number}")
}

/// Dials by logging the `tel:` URI. With an opener configured, it must be
/// called from inside a tokio runtime.
pub struct TelDialer {
    open_command: Option<String>,
}

impl TelDialer {
    pub fn new(open_command: Option<String>) -> Self {
        Self { open_command }
    }
}

impl Dialer for TelDialer {
    fn dial(&self, phone_number: &str) {
        let uri = tel_uri(phone_number);
        tracing::info!("📞 Dial {}", uri);

        let Some(cmd) = self.open_command.as_deref() else {
            return;
        };
        // Fire and forget; the child is reaped by the runtime.
        match tokio::process::Command::new(cmd).arg(&uri).spawn() {
            Ok(_) => tracing::debug!("Opened {} with {}", uri, cmd),
            Err(e) => tracing::warn!("⚠️ Failed to launch '{}': {e}", cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tel_uri() {
        assert_eq!(tel_uri("555-1234"), "tel:555-1234");
        assert_eq!(tel_uri("+1 555 123 4567"), "tel:+15551234567");
    }

    #[test]
    fn test_log_only_dial_does_not_panic() {
        TelDialer::new(None).dial("555-1234");
    }
}
