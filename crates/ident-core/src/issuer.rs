//! # Issuers
//!
//! An issuer is the trust anchor under which identifiers are minted. It is
//! keyed by its common name, a hostname-shaped string, and is immutable once
//! registered.

use serde::{Deserialize, Serialize};

use crate::jwk::Jwk;

/// How an issuer proved control of its common name at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    /// Not yet registered.
    #[serde(rename = "ISSUER_AUTH_TYPE_UNSPECIFIED")]
    #[default]
    Unspecified,
    /// Anchored by a federated identity provider.
    #[serde(rename = "ISSUER_AUTH_TYPE_IDP")]
    Idp,
    /// Anchored by the issuer's own key pair.
    #[serde(rename = "ISSUER_AUTH_TYPE_SELF")]
    SelfSigned,
}

/// A registered issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// Hostname-shaped unique key.
    pub common_name: String,
    /// Display organization name.
    #[serde(default)]
    pub organization: String,
    /// Display sub-organization name.
    #[serde(default)]
    pub sub_organization: String,
    /// Public-only JWK.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Jwk>,
    /// Whether a federated provider vouched for the common name.
    #[serde(default)]
    pub verified: bool,
    /// How the issuer is anchored; set by the node at registration.
    #[serde(default)]
    pub auth_type: AuthType,
}

impl Issuer {
    /// An unregistered issuer with `public_key`.
    pub fn new(common_name: impl Into<String>, public_key: Jwk) -> Self {
        Self {
            common_name: common_name.into(),
            public_key: Some(public_key),
            ..Self::default()
        }
    }

    /// Set the display organization names.
    pub fn with_organization(
        mut self,
        organization: impl Into<String>,
        sub_organization: impl Into<String>,
    ) -> Self {
        self.organization = organization.into();
        self.sub_organization = sub_organization.into();
        self
    }
}
