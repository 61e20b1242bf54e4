//! # In-Memory Repositories
//!
//! Reference implementations of the repository ports. Each create call
//! checks and inserts under one write lock, so uniqueness holds even when
//! two requests race past the services' own checks.
//!
//! Locks are `parking_lot` and never held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ident_core::{
    IdRepository, Issuer, IssuerRepository, RepositoryError, ResolverMetadata, VcRepository,
    VerifiableCredential,
};
use parking_lot::RwLock;

/// Thread-safe, cloneable map from string keys to records.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert `value` unless `key` is taken. Returns `false` if it was.
    pub fn insert_new(&self, key: &str, value: T) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(key) {
            return false;
        }
        guard.insert(key.to_string(), value);
        true
    }

    /// A copy of the record at `key`.
    pub fn get(&self, key: &str) -> Option<T> {
        self.data.read().get(key).cloned()
    }

    /// Apply `f` to the record at `key`, creating it from `Default` first.
    pub fn upsert_with(&self, key: &str, f: impl FnOnce(&mut T))
    where
        T: Default,
    {
        f(self.data.write().entry(key.to_string()).or_default());
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Issuers
// ---------------------------------------------------------------------------

/// In-memory [`IssuerRepository`].
#[derive(Debug, Clone, Default)]
pub struct MemoryIssuerRepository {
    issuers: Store<Issuer>,
}

impl MemoryIssuerRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IssuerRepository for MemoryIssuerRepository {
    async fn create_issuer(&self, issuer: &Issuer) -> Result<(), RepositoryError> {
        if self.issuers.insert_new(&issuer.common_name, issuer.clone()) {
            Ok(())
        } else {
            Err(RepositoryError::AlreadyExists(format!(
                "issuer {}",
                issuer.common_name
            )))
        }
    }

    async fn get_issuer(&self, common_name: &str) -> Result<Issuer, RepositoryError> {
        self.issuers
            .get(common_name)
            .ok_or_else(|| RepositoryError::NotFound(format!("issuer {common_name}")))
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct IdRecord {
    metadata: ResolverMetadata,
    controller: String,
}

/// In-memory [`IdRepository`].
#[derive(Debug, Clone, Default)]
pub struct MemoryIdRepository {
    ids: Store<IdRecord>,
}

impl MemoryIdRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers minted under the issuer `common_name`.
    pub fn ids_controlled_by(&self, common_name: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .ids
            .data
            .read()
            .iter()
            .filter(|(_, record)| record.controller == common_name)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl IdRepository for MemoryIdRepository {
    async fn create_id(
        &self,
        metadata: &ResolverMetadata,
        issuer: &Issuer,
    ) -> Result<(), RepositoryError> {
        let record = IdRecord {
            metadata: metadata.clone(),
            controller: issuer.common_name.clone(),
        };
        if self.ids.insert_new(&metadata.id, record) {
            Ok(())
        } else {
            Err(RepositoryError::AlreadyExists(format!("id {}", metadata.id)))
        }
    }

    async fn resolve_id(&self, id: &str) -> Result<ResolverMetadata, RepositoryError> {
        self.ids
            .get(id)
            .map(|record| record.metadata)
            .ok_or_else(|| RepositoryError::NotFound(format!("id {id}")))
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// In-memory [`VcRepository`].
#[derive(Debug, Clone, Default)]
pub struct MemoryVcRepository {
    vcs: Store<Vec<VerifiableCredential>>,
}

impl MemoryVcRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VcRepository for MemoryVcRepository {
    async fn create(
        &self,
        credential: &VerifiableCredential,
        resolver_metadata_id: &str,
    ) -> Result<(), RepositoryError> {
        let mut duplicate = false;
        self.vcs.upsert_with(resolver_metadata_id, |stored| {
            if !credential.id.is_empty() && stored.iter().any(|vc| vc.id == credential.id) {
                duplicate = true;
            } else {
                stored.push(credential.clone());
            }
        });
        if duplicate {
            return Err(RepositoryError::AlreadyExists(format!(
                "credential {}",
                credential.id
            )));
        }
        Ok(())
    }

    async fn get_by_resolver_metadata(
        &self,
        resolver_metadata_id: &str,
    ) -> Result<Vec<VerifiableCredential>, RepositoryError> {
        match self.vcs.get(resolver_metadata_id) {
            Some(vcs) if !vcs.is_empty() => Ok(vcs),
            _ => Err(RepositoryError::NotFound(format!(
                "credentials for {resolver_metadata_id}"
            ))),
        }
    }
}
