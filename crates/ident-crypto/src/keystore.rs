//! # Key Storage
//!
//! Port for the vault that holds private JWKs used for signing. Backends
//! such as a local file store or a HashiCorp Vault KV mount implement
//! [`KeyStore`]; [`MemoryKeyStore`] is the in-process implementation.
//!
//! ## Security Invariants
//!
//! - `KeyStore` is `Send + Sync` for use across async tasks.
//! - Serialized key material held by [`MemoryKeyStore`] is zeroized when
//!   replaced or dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use ident_core::Jwk;
use parking_lot::RwLock;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Storage backend for private signing keys.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Store `key` under `id`, replacing any previous key.
    async fn store_key(&self, id: &str, key: &Jwk) -> Result<(), CryptoError>;

    /// Load the key stored under `id`.
    async fn retrieve_key(&self, id: &str) -> Result<Jwk, CryptoError>;

    /// Human-readable name for this backend (for diagnostics/logging).
    fn store_name(&self) -> &str;
}

// ─── MemoryKeyStore ──────────────────────────────────────────────────────

/// In-process [`KeyStore`].
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, Zeroizing<String>>>,
}

impl MemoryKeyStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn store_key(&self, id: &str, key: &Jwk) -> Result<(), CryptoError> {
        let serialized = serde_json::to_string(key)
            .map_err(|e| CryptoError::Storage(e.to_string()))?;
        self.keys
            .write()
            .insert(id.to_string(), Zeroizing::new(serialized));
        tracing::debug!(store = self.store_name(), id, "stored key");
        Ok(())
    }

    async fn retrieve_key(&self, id: &str) -> Result<Jwk, CryptoError> {
        let guard = self.keys.read();
        let serialized = guard
            .get(id)
            .ok_or_else(|| CryptoError::KeyNotFound(id.to_string()))?;
        serde_json::from_str(serialized).map_err(|e| CryptoError::Storage(e.to_string()))
    }

    fn store_name(&self) -> &str {
        "MemoryKeyStore"
    }
}
