//! # Resolver Metadata
//!
//! The DID-like document that anchors an identifier to the public keys able
//! to sign claims for it. Documents are created once when the identifier is
//! minted and are read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::jwk::{Jwk, Jwks};

/// Identifier scheme prefixes, one per identity provider.
pub mod scheme {
    /// Identifiers anchored by Okta.
    pub const OKTA: &str = "OKTA-";
    /// Identifiers anchored by Duo.
    pub const DUO: &str = "DUO-";
    /// Identifiers anchored by the issuer's own key.
    pub const SELF_SIGNED: &str = "AGNTCY-";
}

/// A key able to sign for an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// `{identifier}#{key id}`.
    pub id: String,
    /// Public key.
    #[serde(
        rename = "publicKeyJwk",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_key_jwk: Option<Jwk>,
}

/// Endpoint where the identifier's provider is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Endpoint URLs.
    #[serde(rename = "serviceEndpoint", default)]
    pub service_endpoint: Vec<String>,
}

/// Document anchoring an identifier to its keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverMetadata {
    /// The identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Keys able to sign for the identifier.
    #[serde(
        rename = "verificationMethod",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub verification_method: Vec<VerificationMethod>,
    /// Provider endpoints; empty for self-anchored identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
    /// Ids of the verification methods usable for assertions.
    #[serde(
        rename = "assertionMethod",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub assertion_method: Vec<String>,
    /// Common name of the controlling issuer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub controller: String,
}

impl ResolverMetadata {
    /// Every public key listed by the document's verification methods.
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: self
                .verification_method
                .iter()
                .filter_map(|vm| vm.public_key_jwk.clone())
                .collect(),
        }
    }
}
