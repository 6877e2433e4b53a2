//! In-memory key storage, for tests and ephemeral wallets.

use crate::ports::outbound::{KeyStore, KeyStoreError};
use parking_lot::Mutex;
use zeroize::Zeroizing;

/// Key store holding at most one key in process memory.
///
/// The key is zeroized when replaced or dropped.
#[derive(Default)]
pub struct InMemoryKeyStore {
    key: Mutex<Option<Zeroizing<[u8; 32]>>>,
}

impl InMemoryKeyStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `key`.
    pub fn with_key(key: [u8; 32]) -> Self {
        Self {
            key: Mutex::new(Some(Zeroizing::new(key))),
        }
    }

    /// Returns true if a key has been stored.
    pub fn has_key(&self) -> bool {
        self.key.lock().is_some()
    }
}

#[async_trait::async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn load_private_key(&self) -> Result<Option<Zeroizing<[u8; 32]>>, KeyStoreError> {
        Ok(self.key.lock().clone())
    }

    async fn save_private_key(&self, key: &[u8; 32]) -> Result<(), KeyStoreError> {
        *self.key.lock() = Some(Zeroizing::new(*key));
        Ok(())
    }
}
