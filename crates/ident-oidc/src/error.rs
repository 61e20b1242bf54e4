//! Errors raised while parsing and verifying OIDC proofs.

use ident_crypto::CryptoError;
use thiserror::Error;

/// Failure to verify or attribute a proof.
#[derive(Error, Debug)]
pub enum OidcError {
    /// Token could not be decoded.
    #[error("malformed jwt: {0}")]
    MalformedJwt(String),

    /// A required claim is absent or empty.
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),

    /// Time-based claims (`exp`, `nbf`) rejected the token.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    /// Neither OIDC nor OAuth metadata yielded a JWKS location.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// Transport failure, non-success status or oversized body.
    #[error("http request failed: {0}")]
    Http(String),

    /// The JWKS response is not a usable key set.
    #[error("invalid jwks: {0}")]
    InvalidJwks(String),

    /// JWKS endpoint matched no known identity provider.
    #[error("unknown identity provider at {0}")]
    UnknownProvider(String),

    /// No key verifies the token.
    #[error("signature verification failed: {0}")]
    InvalidSignature(#[from] CryptoError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The named variable holds an unparsable value; the second field says why.
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}
