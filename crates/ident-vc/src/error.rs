//! Errors raised while parsing, verifying or issuing credentials.

use ident_crypto::CryptoError;
use thiserror::Error;

/// Failure to parse, verify or issue a credential.
#[derive(Error, Debug)]
pub enum VcError {
    /// Unspecified envelope type, or one that is not implemented.
    #[error("invalid envelope type: {0}")]
    InvalidEnvelopeType(String),

    /// The envelope value is not a compact JWS carrying a credential.
    #[error("invalid envelope value: {0}")]
    InvalidEnvelopeValue(String),

    /// No key of the set verifies the envelope.
    #[error("signature verification failed: {0}")]
    InvalidSignature(CryptoError),

    /// A revocation status entry is present.
    #[error("credential is revoked")]
    Revoked,

    /// `expirationDate` is in the past.
    #[error("credential expired at {0}")]
    Expired(String),

    /// The credential content violates a structural rule.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The signing key is missing, public or invalid.
    #[error("signing failed: {0}")]
    Signing(CryptoError),
}
