//! # Identity Provider Fingerprinting
//!
//! Federated proofs are attributed to a provider by inspecting the response
//! of its JWKS endpoint. The result is a closed set: trust decisions match on
//! [`Provider`] exhaustively and never compare provider names as strings.

use reqwest::header::{HeaderMap, SERVER};
use serde::{Deserialize, Serialize};
use url::Url;

/// Response header every Okta endpoint sets.
pub const OKTA_REQUEST_ID_HEADER: &str = "x-okta-request-id";
/// Registrable domain Duo tenants are served under.
pub const DUO_DOMAIN: &str = "duosecurity.com";

/// Who vouches for a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Okta.
    Okta,
    /// Duo Security.
    Duo,
    /// Signed with the issuer's own registered key.
    #[serde(rename = "Self")]
    SelfSigned,
    /// Any other key set origin.
    Unknown,
}

impl Provider {
    /// Fingerprint a provider from the headers and final URL of its JWKS
    /// response.
    pub fn detect(headers: &HeaderMap, url: &Url) -> Self {
        if headers.contains_key(OKTA_REQUEST_ID_HEADER) {
            return Self::Okta;
        }
        let server_is_duo = headers
            .get(SERVER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().starts_with("duo"))
            .unwrap_or(false);
        let host_is_duo = url.host_str().map(is_duo_host).unwrap_or(false);
        if server_is_duo || host_is_duo {
            return Self::Duo;
        }
        Self::Unknown
    }

    /// Whether the provider is a federated identity provider.
    pub fn is_federated(self) -> bool {
        matches!(self, Self::Okta | Self::Duo)
    }
}

/// `duosecurity.com` itself or one of its subdomains.
fn is_duo_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    match host.strip_suffix(DUO_DOMAIN) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Okta => "Okta",
            Self::Duo => "Duo",
            Self::SelfSigned => "Self",
            Self::Unknown => "Unknown",
        })
    }
}

// ---------------------------------------------------------------------------
// Discovery locations
// ---------------------------------------------------------------------------

/// `{issuer}/.well-known/openid-configuration`.
pub fn oidc_well_known_url(issuer: &str) -> String {
    format!("{}/.well-known/openid-configuration", issuer.trim_end_matches('/'))
}

/// RFC 8414 metadata location: the well-known segment is inserted between
/// the issuer's origin and its path.
pub fn oauth_well_known_url(issuer: &str) -> Option<String> {
    let mut url = Url::parse(issuer).ok()?;
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("/.well-known/oauth-authorization-server{path}"));
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}
