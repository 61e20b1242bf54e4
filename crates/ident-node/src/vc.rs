//! # Credential Publication and Verification
//!
//! Credentials are accepted only when the publisher authenticates as the
//! subject the credential is about, and when the credential is signed by a
//! key listed in that subject's resolver metadata.
//!
//! ## Ownership Invariant
//!
//! The credential subject identifier must end with the subject the
//! publishing proof authenticated, so one identity cannot publish under
//! another's identifier.

use std::sync::Arc;

use ident_core::proof::JWT_PROOF_TYPE;
use ident_core::{
    EnvelopedCredential, IdRepository, NodeError, Proof, ResolverMetadata, VcRepository,
    VerifiableCredential, VerificationResult,
};

use crate::error::{credential_error, storage_error};
use crate::verification::VerificationService;

/// Media type reported by a successful verification.
pub const VERIFICATION_MEDIA_TYPE: &str = "application/vp";

/// Credential publication, verification and listing.
pub struct VcService {
    ids: Arc<dyn IdRepository>,
    vcs: Arc<dyn VcRepository>,
    verification: Arc<VerificationService>,
}

impl VcService {
    /// A service over `ids` and `vcs`, verifying proofs through `verification`.
    pub fn new(
        ids: Arc<dyn IdRepository>,
        vcs: Arc<dyn VcRepository>,
        verification: Arc<VerificationService>,
    ) -> Self {
        Self {
            ids,
            vcs,
            verification,
        }
    }

    /// Store `credential` under its subject identifier after authenticating
    /// the publisher with `proof` and verifying the credential's signature.
    pub async fn publish(
        &self,
        credential: &EnvelopedCredential,
        proof: Option<&Proof>,
    ) -> Result<(), NodeError> {
        let parsed = parse_envelope(credential)?;
        let id = subject_id(&parsed)?;

        let (jwt, _issuer) = self.verification.verify_existing_issuer(proof).await?;
        if !id.ends_with(&jwt.claims.subject) {
            return Err(NodeError::InvalidVerifiableCredential(
                "the id in the verifiable credential does not match the id in the proof".into(),
            ));
        }

        let (vc, _metadata) = self.verify_envelope(credential, false).await?;

        self.vcs
            .create(&vc, &id)
            .await
            .map_err(|e| storage_error("unable to store verifiable credential", e))?;

        tracing::info!(id = %id, credential = %vc.id, "credential published");
        Ok(())
    }

    /// Verify `credential` against the resolver metadata of its subject.
    pub async fn verify(&self, credential: &EnvelopedCredential) -> Result<VerificationResult, NodeError> {
        let (document, metadata) = self.verify_envelope(credential, true).await?;
        Ok(VerificationResult {
            status: true,
            document,
            controller: metadata.controller,
            controlled_identifier_document: metadata.id,
            media_type: VERIFICATION_MEDIA_TYPE.to_string(),
        })
    }

    /// Every stored credential about `resolver_metadata_id`, as envelopes.
    pub async fn get_vcs(&self, resolver_metadata_id: &str) -> Result<Vec<EnvelopedCredential>, NodeError> {
        let vcs = match self.vcs.get_by_resolver_metadata(resolver_metadata_id).await {
            Ok(vcs) => vcs,
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = resolver_metadata_id, "no credentials stored");
                return Ok(Vec::new());
            }
            Err(e) => return Err(storage_error("unable to retrieve verifiable credentials", e)),
        };

        Ok(vcs
            .into_iter()
            .filter_map(|vc| match vc.proof {
                Some(Proof {
                    proof_type,
                    proof_value,
                    ..
                }) if proof_type == JWT_PROOF_TYPE && !proof_value.is_empty() => {
                    Some(EnvelopedCredential::jose(proof_value))
                }
                Some(proof) => {
                    tracing::debug!(
                        credential = %vc.id,
                        proof_type = %proof.proof_type,
                        "skipping credential with unusable proof"
                    );
                    None
                }
                None => {
                    tracing::debug!(credential = %vc.id, "skipping credential without proof");
                    None
                }
            })
            .collect())
    }

    async fn verify_envelope(
        &self,
        credential: &EnvelopedCredential,
        check_status: bool,
    ) -> Result<(VerifiableCredential, ResolverMetadata), NodeError> {
        let parsed = parse_envelope(credential)?;
        let id = subject_id(&parsed)?;

        let metadata = self.ids.resolve_id(&id).await.map_err(|e| {
            if e.is_not_found() {
                NodeError::ResolverMetadataNotFound(format!(
                    "could not resolve the id ({id}) to a resolver metadata"
                ))
            } else {
                storage_error("unable to resolve id", e)
            }
        })?;

        let vc = ident_vc::verify(credential, &metadata.jwks(), check_status)
            .map_err(credential_error)?;
        Ok((vc, metadata))
    }
}

fn parse_envelope(credential: &EnvelopedCredential) -> Result<VerifiableCredential, NodeError> {
    if credential.value.is_empty() {
        return Err(NodeError::InvalidCredentialEnvelopeValueFormat(
            "invalid credential envelope value".into(),
        ));
    }
    ident_vc::parse(credential).map_err(credential_error)
}

fn subject_id(vc: &VerifiableCredential) -> Result<String, NodeError> {
    vc.did().map(str::to_string).ok_or_else(|| {
        NodeError::InvalidVerifiableCredential(
            "unable to find the id inside the credential subject".into(),
        )
    })
}
