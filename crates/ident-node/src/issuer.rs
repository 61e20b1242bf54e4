//! Issuer registration and key publication.

use std::sync::Arc;

use ident_core::{net, AuthType, Issuer, IssuerRepository, Jwks, NodeError, Proof};
use ident_oidc::Provider;

use crate::error::storage_error;
use crate::verification::VerificationService;

/// Issuer registration and key lookup.
pub struct IssuerService {
    issuers: Arc<dyn IssuerRepository>,
    verification: Arc<VerificationService>,
}

impl IssuerService {
    /// A service over `issuers`, verifying proofs through `verification`.
    pub fn new(issuers: Arc<dyn IssuerRepository>, verification: Arc<VerificationService>) -> Self {
        Self {
            issuers,
            verification,
        }
    }

    /// Register `issuer` after verifying `proof` of control over its common
    /// name. Registration happens at most once per common name.
    ///
    /// Returns the stored record, with `verified` and `auth_type` set from
    /// the proof.
    pub async fn register(&self, issuer: &Issuer, proof: Option<&Proof>) -> Result<Issuer, NodeError> {
        if !net::is_valid_common_name(&issuer.common_name) {
            return Err(NodeError::InvalidIssuer(format!(
                "invalid common name {:?}",
                issuer.common_name
            )));
        }
        let public_key = issuer
            .public_key
            .as_ref()
            .ok_or_else(|| NodeError::InvalidIssuer("issuer has no public key".into()))?;
        ident_crypto::validate_public_key(public_key)
            .map_err(|e| NodeError::InvalidIssuer(format!("issuer has invalid public key: {e}")))?;

        let (verified, provider) = self.verification.verify(issuer, proof).await?;

        match self.issuers.get_issuer(&issuer.common_name).await {
            Ok(_) => return Err(NodeError::InvalidIssuer("issuer already exists".into())),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(storage_error("unable to check issuer uniqueness", e)),
        }

        let record = Issuer {
            verified,
            auth_type: match provider {
                Provider::SelfSigned => AuthType::SelfSigned,
                Provider::Okta | Provider::Duo | Provider::Unknown => AuthType::Idp,
            },
            ..issuer.clone()
        };
        self.issuers
            .create_issuer(&record)
            .await
            .map_err(|e| storage_error("unable to store issuer", e))?;

        tracing::info!(
            common_name = %record.common_name,
            auth_type = ?record.auth_type,
            verified = record.verified,
            "issuer registered"
        );
        Ok(record)
    }

    /// The public key set of the issuer `common_name`.
    pub async fn get_jwks(&self, common_name: &str) -> Result<Jwks, NodeError> {
        if common_name.is_empty() {
            return Err(NodeError::InvalidIssuer("issuer common name is empty".into()));
        }
        let issuer = self.issuers.get_issuer(common_name).await.map_err(|e| {
            if e.is_not_found() {
                NodeError::IssuerNotRegistered(format!("the issuer {common_name} is not registered"))
            } else {
                storage_error("unable to load issuer", e)
            }
        })?;
        issuer
            .public_key
            .map(|key| key.public_key().to_jwks())
            .ok_or_else(|| NodeError::internal(format!("issuer {common_name} has no public key")))
    }
}
