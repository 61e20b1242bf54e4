//! # Identifiers
//!
//! Minting and resolution of scheme-prefixed identifiers. An identifier is
//! `{scheme}{subject}`, where the scheme names the provider that
//! authenticated the subject (`OKTA-`, `DUO-`, or `AGNTCY-` for self-signed
//! proofs). Identifiers are unique across the whole node.

use std::sync::Arc;

use ident_core::resolver::scheme;
use ident_core::{
    AuthType, IdRepository, Issuer, NodeError, Proof, ResolverMetadata, Service,
    VerificationMethod,
};
use ident_oidc::{ParsedJwt, Provider};

use crate::error::storage_error;
use crate::verification::VerificationService;

/// The identifier scheme prefix for a provider.
pub fn scheme_for(provider: Provider) -> Result<&'static str, NodeError> {
    match provider {
        Provider::Okta => Ok(scheme::OKTA),
        Provider::Duo => Ok(scheme::DUO),
        Provider::SelfSigned => Ok(scheme::SELF_SIGNED),
        Provider::Unknown => Err(NodeError::UnknownIdp("unknown JWT provider".into())),
    }
}

/// Derives identifiers from authenticated proofs.
pub struct IdGenerator {
    verification: Arc<VerificationService>,
}

impl IdGenerator {
    /// A generator authenticating through `verification`.
    pub fn new(verification: Arc<VerificationService>) -> Self {
        Self { verification }
    }

    /// Authenticate `proof` against its registered issuer and derive the
    /// identifier it entitles the subject to.
    pub async fn generate_from_proof(
        &self,
        proof: Option<&Proof>,
    ) -> Result<(String, Issuer), NodeError> {
        let (parsed, issuer): (ParsedJwt, Issuer) =
            self.verification.verify_existing_issuer(proof).await?;
        let id = format!("{}{}", scheme_for(parsed.provider)?, parsed.claims.subject);
        Ok((id, issuer))
    }
}

/// Identifier minting and resolution.
pub struct IdService {
    ids: Arc<dyn IdRepository>,
    generator: IdGenerator,
    service_scheme: String,
}

impl IdService {
    /// A service over `ids` advertising IdP endpoints with `service_scheme`.
    pub fn new(
        ids: Arc<dyn IdRepository>,
        generator: IdGenerator,
        service_scheme: impl Into<String>,
    ) -> Self {
        Self {
            ids,
            generator,
            service_scheme: service_scheme.into(),
        }
    }

    /// Mint an identifier under `issuer` for the subject authenticated by
    /// `proof`, and store its resolver metadata.
    pub async fn generate(
        &self,
        issuer: &Issuer,
        proof: Option<&Proof>,
    ) -> Result<ResolverMetadata, NodeError> {
        let (id, stored) = self.generator.generate_from_proof(proof).await?;

        match self.ids.resolve_id(&id).await {
            Err(e) if e.is_not_found() => {}
            Ok(_) => return Err(NodeError::IdAlreadyRegistered(format!("id {id} already exists"))),
            Err(e) => return Err(storage_error("unable to verify the uniqueness of the id", e)),
        }

        if issuer.common_name != stored.common_name {
            return Err(NodeError::InvalidIssuer(format!(
                "the proof authenticates issuer {}, not {}",
                stored.common_name, issuer.common_name
            )));
        }

        let key_id = format!("{id}#{}", uuid::Uuid::new_v4());
        let service = match stored.auth_type {
            AuthType::Idp => vec![Service {
                service_endpoint: vec![format!("{}://{}", self.service_scheme, stored.common_name)],
            }],
            AuthType::SelfSigned | AuthType::Unspecified => Vec::new(),
        };
        let metadata = ResolverMetadata {
            id: id.clone(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                public_key_jwk: stored.public_key.as_ref().map(|key| key.public_key()),
            }],
            service,
            assertion_method: vec![key_id],
            controller: stored.common_name.clone(),
        };

        self.ids
            .create_id(&metadata, &stored)
            .await
            .map_err(|e| storage_error("unable to store the resolver metadata", e))?;

        tracing::info!(id = %id, controller = %stored.common_name, "identifier minted");
        Ok(metadata)
    }

    /// The resolver metadata stored for `id`.
    pub async fn resolve(&self, id: &str) -> Result<ResolverMetadata, NodeError> {
        self.ids.resolve_id(id).await.map_err(|e| {
            if e.is_not_found() {
                NodeError::ResolverMetadataNotFound(format!(
                    "could not resolve the id ({id}) to a resolver metadata"
                ))
            } else {
                storage_error("unable to resolve id", e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ident_core::ErrorReason;

    #[test]
    fn schemes_by_provider() {
        assert_eq!(scheme_for(Provider::Okta).unwrap(), "OKTA-");
        assert_eq!(scheme_for(Provider::Duo).unwrap(), "DUO-");
        assert_eq!(scheme_for(Provider::SelfSigned).unwrap(), "AGNTCY-");
        assert_eq!(scheme_for(Provider::Unknown).unwrap_err().reason(), ErrorReason::UnknownIdp);
    }
}
