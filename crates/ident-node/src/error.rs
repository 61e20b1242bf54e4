//! Translation of collaborator errors into the node taxonomy.

use ident_core::{NodeError, RepositoryError};
use ident_oidc::OidcError;
use ident_vc::VcError;

/// A proof that failed parsing or verification.
pub(crate) fn proof_error(err: OidcError) -> NodeError {
    match err {
        OidcError::UnknownProvider(host) => {
            NodeError::UnknownIdp(format!("no known identity provider serves {host}"))
        }
        other => NodeError::InvalidProof(other.to_string()),
    }
}

/// A credential envelope that failed parsing or verification.
pub(crate) fn credential_error(err: VcError) -> NodeError {
    match err {
        VcError::InvalidEnvelopeType(m) => NodeError::InvalidCredentialEnvelopeType(m),
        VcError::InvalidEnvelopeValue(m) => NodeError::InvalidCredentialEnvelopeValueFormat(m),
        other @ (VcError::InvalidSignature(_)
        | VcError::Revoked
        | VcError::Expired(_)
        | VcError::InvalidCredential(_)
        | VcError::Signing(_)) => NodeError::InvalidVerifiableCredential(other.to_string()),
    }
}

/// A storage failure that is not an expected "not found".
pub(crate) fn storage_error(message: &str, err: RepositoryError) -> NodeError {
    NodeError::internal_with(message, err)
}
