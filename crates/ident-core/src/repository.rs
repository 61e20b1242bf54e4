//! # Repository Ports
//!
//! Storage interfaces the node depends on. Backends (filesystem, relational,
//! in-memory) implement these traits and are injected at construction; the
//! services never branch on backend type.
//!
//! ## Contract
//!
//! - Lookups return [`RepositoryError::NotFound`] for missing records. It is
//!   the only error callers branch on.
//! - Create calls must enforce key uniqueness atomically. The services'
//!   check-then-insert is advisory; the backend's constraint is authoritative.

use async_trait::async_trait;
use thiserror::Error;

use crate::credential::VerifiableCredential;
use crate::issuer::Issuer;
use crate::resolver::ResolverMetadata;

/// Failure of a storage backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No record under the key.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// A record already exists under the key.
    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Whether this is [`RepositoryError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Issuers keyed by common name.
#[async_trait]
pub trait IssuerRepository: Send + Sync {
    /// Store `issuer`, failing with `AlreadyExists` on a taken common name.
    async fn create_issuer(&self, issuer: &Issuer) -> Result<(), RepositoryError>;

    /// Load the issuer registered under `common_name`.
    async fn get_issuer(&self, common_name: &str) -> Result<Issuer, RepositoryError>;
}

/// Resolver metadata keyed by identifier.
#[async_trait]
pub trait IdRepository: Send + Sync {
    /// Store `metadata` minted under `issuer`, failing with `AlreadyExists`
    /// on a taken identifier.
    async fn create_id(
        &self,
        metadata: &ResolverMetadata,
        issuer: &Issuer,
    ) -> Result<(), RepositoryError>;

    /// Load the metadata of `id`.
    async fn resolve_id(&self, id: &str) -> Result<ResolverMetadata, RepositoryError>;
}

/// Verifiable credentials grouped by the identifier they target.
#[async_trait]
pub trait VcRepository: Send + Sync {
    /// Store `credential` under the identifier it targets.
    async fn create(
        &self,
        credential: &VerifiableCredential,
        resolver_metadata_id: &str,
    ) -> Result<(), RepositoryError>;

    /// All credentials stored for an identifier. May return `NotFound` or an
    /// empty list when there are none.
    async fn get_by_resolver_metadata(
        &self,
        resolver_metadata_id: &str,
    ) -> Result<Vec<VerifiableCredential>, RepositoryError>;
}
