//! # Node Composition
//!
//! [`Node`] wires the repositories, the proof parser and the services, and
//! exposes the operations front ends call.

use std::sync::Arc;

use ident_core::{
    EnvelopedCredential, IdRepository, Issuer, IssuerRepository, Jwks, NodeError, Proof,
    ResolverMetadata, VcRepository, VerificationResult,
};
use ident_oidc::{JwtParser, OidcParser};

use crate::config::NodeConfig;
use crate::id::{IdGenerator, IdService};
use crate::issuer::IssuerService;
use crate::memory::{MemoryIdRepository, MemoryIssuerRepository, MemoryVcRepository};
use crate::vc::VcService;
use crate::verification::VerificationService;

/// The identity node: every public operation, over injected storage and
/// proof parsing.
pub struct Node {
    issuers: IssuerService,
    ids: IdService,
    vcs: VcService,
    verification: Arc<VerificationService>,
}

impl Node {
    /// A node over in-memory repositories and a network-backed OIDC parser.
    pub fn in_memory(config: NodeConfig) -> Result<Self, NodeError> {
        let parser = OidcParser::new(config.oidc.clone())
            .map_err(|e| NodeError::internal_with("unable to build the OIDC parser", e))?;
        Ok(Self::with_parts(
            Arc::new(parser),
            Arc::new(MemoryIssuerRepository::new()),
            Arc::new(MemoryIdRepository::new()),
            Arc::new(MemoryVcRepository::new()),
            &config,
        ))
    }

    /// A node over the given parser and repositories.
    pub fn with_parts(
        parser: Arc<dyn JwtParser>,
        issuer_repository: Arc<dyn IssuerRepository>,
        id_repository: Arc<dyn IdRepository>,
        vc_repository: Arc<dyn VcRepository>,
        config: &NodeConfig,
    ) -> Self {
        let verification = Arc::new(VerificationService::new(
            parser,
            Arc::clone(&issuer_repository),
        ));
        Self {
            issuers: IssuerService::new(issuer_repository, Arc::clone(&verification)),
            ids: IdService::new(
                Arc::clone(&id_repository),
                IdGenerator::new(Arc::clone(&verification)),
                config.service_scheme.clone(),
            ),
            vcs: VcService::new(id_repository, vc_repository, Arc::clone(&verification)),
            verification,
        }
    }

    /// See [`IssuerService::register`].
    pub async fn register(&self, issuer: &Issuer, proof: Option<&Proof>) -> Result<Issuer, NodeError> {
        self.issuers.register(issuer, proof).await
    }

    /// See [`IssuerService::get_jwks`].
    pub async fn get_jwks(&self, common_name: &str) -> Result<Jwks, NodeError> {
        self.issuers.get_jwks(common_name).await
    }

    /// See [`IdService::generate`].
    pub async fn generate(
        &self,
        issuer: &Issuer,
        proof: Option<&Proof>,
    ) -> Result<ResolverMetadata, NodeError> {
        self.ids.generate(issuer, proof).await
    }

    /// See [`IdService::resolve`].
    pub async fn resolve(&self, id: &str) -> Result<ResolverMetadata, NodeError> {
        self.ids.resolve(id).await
    }

    /// See [`VcService::publish`].
    pub async fn publish(
        &self,
        credential: &EnvelopedCredential,
        proof: Option<&Proof>,
    ) -> Result<(), NodeError> {
        self.vcs.publish(credential, proof).await
    }

    /// See [`VcService::verify`].
    pub async fn verify(&self, credential: &EnvelopedCredential) -> Result<VerificationResult, NodeError> {
        self.vcs.verify(credential).await
    }

    /// See [`VcService::get_vcs`].
    pub async fn get_vcs(&self, resolver_metadata_id: &str) -> Result<Vec<EnvelopedCredential>, NodeError> {
        self.vcs.get_vcs(resolver_metadata_id).await
    }

    /// The shared proof verification service.
    pub fn verification(&self) -> &VerificationService {
        &self.verification
    }
}
