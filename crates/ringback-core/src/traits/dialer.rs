//! Telephony dialer.

/// Opens the system dialer. Fire-and-forget: failures are not observable here.
pub trait Dialer: Send + Sync {
    fn dial(&self, phone_number: &str);
}
