//! Durable key-value persistence.

use async_trait::async_trait;

use crate::error::Result;

/// Exclusive hold on a key. Dropping it releases the key.
pub struct KeyGuard {
    _inner: Option<Box<dyn Send + Sync>>,
}

impl KeyGuard {
    /// Guard for backends private to one process; holds nothing.
    pub fn none() -> Self {
        Self { _inner: None }
    }

    /// Guard that releases the key when `inner` is dropped.
    pub fn new(inner: impl Send + Sync + 'static) -> Self {
        Self {
            _inner: Some(Box::new(inner)),
        }
    }
}

/// String blobs keyed by name. Implementations must be crash-safe per `set`,
/// but nothing is transactional across calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Backend name (for logs).
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Hold `key` against writers in other processes until the guard drops.
    /// Backends that no other process can see need not lock anything.
    async fn lock(&self, _key: &str) -> Result<KeyGuard> {
        Ok(KeyGuard::none())
    }
}
