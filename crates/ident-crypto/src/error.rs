//! Errors raised by key handling and JOSE operations.

use thiserror::Error;

/// Failure of a key or JOSE operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Algorithm outside the RSA PKCS#1 v1.5 family.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key fields missing, malformed, or mathematically inconsistent.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The RNG or RSA key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The signer rejected the key or payload.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Token is not a well-formed compact JWS.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// No key in the set verifies the signature.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// No key is stored under the id.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The key store failed to read or write.
    #[error("key storage error: {0}")]
    Storage(String),
}
