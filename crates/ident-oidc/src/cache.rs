//! # JWKS Cache
//!
//! Key sets fetched from identity providers are cached per issuer host,
//! together with the provider fingerprinted from the same response, so a
//! hit skips both discovery and the JWKS request.
//!
//! The cache is an optimization, not a correctness boundary: concurrent
//! misses for the same key may both fetch, and the last writer wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ident_core::Jwks;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// A cached key set and the provider that served it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedJwks {
    /// The provider's public keys.
    pub jwks: Jwks,
    /// Provider fingerprinted from the JWKS response.
    pub provider: Provider,
}

/// Federated key sets keyed by issuer hostname.
#[async_trait]
pub trait JwksCache: Send + Sync {
    /// The live entry under `key`, if any.
    async fn get(&self, key: &str) -> Option<CachedJwks>;

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    async fn set(&self, key: &str, value: CachedJwks, ttl: Duration);
}

struct Entry {
    value: CachedJwks,
    expires_at: Instant,
    size: usize,
    seq: u64,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
    total_bytes: usize,
    next_seq: u64,
}

impl State {
    fn remove(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.total_bytes -= old.size;
        }
    }
}

/// In-process cache bounded by TTL and by total serialized size.
///
/// When an insert would exceed the bound, expired entries are dropped
/// first, then the oldest insertions.
pub struct MemoryJwksCache {
    max_bytes: usize,
    state: RwLock<State>,
}

impl MemoryJwksCache {
    /// An empty cache holding at most `max_bytes` of serialized key sets.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            state: RwLock::new(State::default()),
        }
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized size currently held.
    pub fn size_bytes(&self) -> usize {
        self.state.read().total_bytes
    }

    fn entry_size(key: &str, value: &CachedJwks) -> usize {
        key.len() + serde_json::to_vec(value).map(|v| v.len()).unwrap_or(usize::MAX / 2)
    }
}

#[async_trait]
impl JwksCache for MemoryJwksCache {
    async fn get(&self, key: &str) -> Option<CachedJwks> {
        let now = Instant::now();
        {
            let state = self.state.read();
            match state.entries.get(key) {
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: drop it so it stops counting against the bound.
        let mut state = self.state.write();
        if state.entries.get(key).is_some_and(|e| now >= e.expires_at) {
            state.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: CachedJwks, ttl: Duration) {
        let size = Self::entry_size(key, &value);
        if size > self.max_bytes {
            tracing::warn!(key, size, max = self.max_bytes, "jwks too large to cache");
            return;
        }

        let now = Instant::now();
        let mut state = self.state.write();
        state.remove(key);

        if state.total_bytes + size > self.max_bytes {
            let expired: Vec<String> = state
                .entries
                .iter()
                .filter(|(_, e)| now >= e.expires_at)
                .map(|(k, _)| k.clone())
                .collect();
            for k in expired {
                state.remove(&k);
            }
        }
        while state.total_bytes + size > self.max_bytes {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => state.remove(&k),
                None => break,
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.total_bytes += size;
        state.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
                size,
                seq,
            },
        );
    }
}
