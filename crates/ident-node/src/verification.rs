//! # Issuer Verification
//!
//! Proof checks shared by every node operation.
//!
//! A proof is self-signed when its unverified `iss` is a bare common name,
//! and federated when `iss` is an `http(s)` URL. Self-signed proofs are
//! verified against the issuer's registered public key; federated proofs
//! against the keys published by the identity provider.
//!
//! ## Trust Consistency
//!
//! An issuer is re-authenticated the same way it was anchored:
//!
//! | Anchored as | Accepted proofs |
//! |-------------|-----------------|
//! | `Idp`       | Okta or Duo     |
//! | `SelfSigned`| self-signed     |
//!
//! Anything else fails with [`NodeError::IdpRequired`].

use std::sync::Arc;

use ident_core::{net, AuthType, Issuer, IssuerRepository, Jwks, NodeError, Proof};
use ident_oidc::{JwtParser, ParsedJwt, Provider};

use crate::error::{proof_error, storage_error};

/// Authenticates proofs and checks them against issuer anchoring.
pub struct VerificationService {
    parser: Arc<dyn JwtParser>,
    issuers: Arc<dyn IssuerRepository>,
}

impl VerificationService {
    /// A service parsing proofs with `parser` and loading issuers from `issuers`.
    pub fn new(parser: Arc<dyn JwtParser>, issuers: Arc<dyn IssuerRepository>) -> Self {
        Self { parser, issuers }
    }

    /// Verify a registration proof for `issuer`, which is not stored yet.
    ///
    /// Returns whether a federated provider vouches for the common name,
    /// and the provider that signed the proof.
    pub async fn verify(
        &self,
        issuer: &Issuer,
        proof: Option<&Proof>,
    ) -> Result<(bool, Provider), NodeError> {
        let token = jwt_value(proof, "a proof is required to verify the issuer's common name")?;
        let claims = self.parser.peek_claims(token).map_err(proof_error)?;

        let jwks = if net::is_http_url(&claims.issuer) {
            None
        } else {
            Some(self_signing_keys(issuer)?)
        };
        let parsed = self
            .parser
            .parse_jwt(token, jwks.as_ref())
            .await
            .map_err(proof_error)?;

        if parsed.common_name != issuer.common_name {
            return Err(NodeError::InvalidIssuer(format!(
                "common name {} does not match the proof issuer {}",
                issuer.common_name, parsed.common_name
            )));
        }

        tracing::debug!(
            common_name = %issuer.common_name,
            provider = %parsed.provider,
            verified = parsed.verified,
            "registration proof verified"
        );
        Ok((parsed.verified, parsed.provider))
    }

    /// Verify a proof against the registered issuer it names.
    pub async fn verify_existing_issuer(
        &self,
        proof: Option<&Proof>,
    ) -> Result<(ParsedJwt, Issuer), NodeError> {
        let token = jwt_value(proof, "proof is empty")?;
        let claims = self.parser.peek_claims(token).map_err(proof_error)?;

        let (parsed, issuer) = if net::is_http_url(&claims.issuer) {
            let parsed = self.parser.parse_jwt(token, None).await.map_err(proof_error)?;
            let issuer = self.get_issuer(&parsed.common_name).await?;
            (parsed, issuer)
        } else {
            let issuer = self.get_issuer(&claims.issuer).await?;
            let jwks = self_signing_keys(&issuer)?;
            let parsed = self
                .parser
                .parse_jwt(token, Some(&jwks))
                .await
                .map_err(proof_error)?;
            (parsed, issuer)
        };

        check_trust_consistency(&issuer, parsed.provider)?;

        tracing::debug!(
            common_name = %issuer.common_name,
            provider = %parsed.provider,
            subject = %parsed.claims.subject,
            "existing issuer verified"
        );
        Ok((parsed, issuer))
    }

    async fn get_issuer(&self, common_name: &str) -> Result<Issuer, NodeError> {
        self.issuers.get_issuer(common_name).await.map_err(|e| {
            if e.is_not_found() {
                NodeError::IssuerNotRegistered(format!("the issuer {common_name} is not registered"))
            } else {
                storage_error("unable to load issuer", e)
            }
        })
    }
}

fn jwt_value<'a>(proof: Option<&'a Proof>, missing: &str) -> Result<&'a str, NodeError> {
    let proof = proof.ok_or_else(|| NodeError::InvalidProof(missing.to_string()))?;
    if !proof.is_jwt() {
        return Err(NodeError::InvalidProof(format!(
            "unsupported proof type: {}",
            proof.proof_type
        )));
    }
    if proof.proof_value.is_empty() {
        return Err(NodeError::InvalidProof("proof value is empty".into()));
    }
    Ok(&proof.proof_value)
}

fn self_signing_keys(issuer: &Issuer) -> Result<Jwks, NodeError> {
    issuer
        .public_key
        .as_ref()
        .map(|key| key.to_jwks())
        .ok_or_else(|| {
            NodeError::InvalidProof(format!(
                "issuer {} has no public key to verify a self-signed proof",
                issuer.common_name
            ))
        })
}

fn check_trust_consistency(issuer: &Issuer, provider: Provider) -> Result<(), NodeError> {
    match (issuer.auth_type, provider) {
        (_, Provider::Unknown) => Err(NodeError::UnknownIdp(
            "the proof provider could not be identified".into(),
        )),
        (AuthType::Idp, Provider::SelfSigned) => Err(NodeError::IdpRequired(
            "the issuer is anchored by an identity provider so the proof must be from it".into(),
        )),
        (AuthType::SelfSigned, Provider::Okta | Provider::Duo) => Err(NodeError::IdpRequired(
            "the issuer is self-anchored so the proof must be signed with its own key".into(),
        )),
        (AuthType::Unspecified, Provider::SelfSigned) if issuer.verified => {
            Err(NodeError::IdpRequired(
                "the issuer is verified so the proof must be from an identity provider".into(),
            ))
        }
        (AuthType::Idp, Provider::Okta | Provider::Duo)
        | (AuthType::SelfSigned, Provider::SelfSigned)
        | (AuthType::Unspecified, _) => Ok(()),
    }
}
