//! # Unverified Claim Inspection
//!
//! Before any key is known, the node reads a proof's `iss` and `sub` to
//! decide where its verification keys come from. Time claims are enforced
//! here already; the signature is checked later against the resolved keys.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::OidcError;

/// The identity claims of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// `iss`: issuer URL, or the common name of a self-signed proof.
    #[serde(rename = "iss")]
    pub issuer: String,
    /// `sub`: the authenticated subject.
    #[serde(rename = "sub")]
    pub subject: String,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

/// Decode `token` without verifying its signature and return its issuer
/// and subject.
///
/// Fails if the token is malformed, if `exp`/`nbf` are violated beyond
/// `leeway_secs`, or if `iss` or `sub` is missing or empty.
pub fn peek_claims(token: &str, leeway_secs: u64) -> Result<Claims, OidcError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_aud = false;
    validation.validate_nbf = true;
    validation.leeway = leeway_secs;

    let data = jsonwebtoken::decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                OidcError::InvalidClaims(e.to_string())
            }
            _ => OidcError::MalformedJwt(e.to_string()),
        })?;

    let issuer = data
        .claims
        .iss
        .filter(|s| !s.is_empty())
        .ok_or(OidcError::MissingClaim("iss"))?;
    let subject = data
        .claims
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(OidcError::MissingClaim("sub"))?;

    Ok(Claims { issuer, subject })
}
