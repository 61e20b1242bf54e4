//! # Proof Parser
//!
//! Turns a proof JWT into a [`ParsedJwt`]: who issued it, who it is about,
//! which provider vouches for it, and the issuer common name it anchors to.
//!
//! ## Key Resolution
//!
//! - **Self-signed**: the caller supplies the issuer's registered key set;
//!   the signature is checked against it and the common name is the raw
//!   `iss` value.
//! - **Federated**: `iss` is an issuer URL. Its OIDC discovery document
//!   (falling back to RFC 8414 OAuth metadata) names the JWKS endpoint, and
//!   the response of that endpoint fingerprints the provider. The common
//!   name is the hostname of `iss`.
//!
//! Federated key sets are cached by hostname. When a token fails against
//! cached keys the set is fetched once more, so a provider's key rotation
//! does not lock callers out until the entry expires.

use std::sync::Arc;

use async_trait::async_trait;
use ident_core::{net, Jwks};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::cache::{CachedJwks, JwksCache, MemoryJwksCache};
use crate::claims::{self, Claims};
use crate::config::OidcConfig;
use crate::error::OidcError;
use crate::http::{HttpFetcher, ReqwestFetcher};
use crate::provider::{self, Provider};

/// A verified proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedJwt {
    /// Who vouches for the proof.
    pub provider: Provider,
    /// `iss` and `sub` of the verified token.
    pub claims: Claims,
    /// Hostname of a federated issuer, or the raw `iss` of a self-signed
    /// proof.
    pub common_name: String,
    /// Whether a federated provider vouches for the common name.
    pub verified: bool,
}

/// Proof verification port used by the node.
#[async_trait]
pub trait JwtParser: Send + Sync {
    /// Verify `jwt` and attribute it to a provider.
    ///
    /// With `jwks_override` the token is treated as self-signed and checked
    /// against that set only; no network access happens.
    async fn parse_jwt(&self, jwt: &str, jwks_override: Option<&Jwks>)
        -> Result<ParsedJwt, OidcError>;

    /// Read `iss` and `sub` without verifying the signature.
    fn peek_claims(&self, jwt: &str) -> Result<Claims, OidcError>;
}

/// Subset of OIDC / OAuth authorization-server metadata the parser reads.
#[derive(Debug, Deserialize)]
struct ProviderMetadata {
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    jwks_uri: Option<String>,
}

/// [`JwtParser`] resolving federated keys through OIDC discovery.
pub struct OidcParser {
    http: Arc<dyn HttpFetcher>,
    cache: Arc<dyn JwksCache>,
    config: OidcConfig,
}

impl OidcParser {
    /// Parser backed by `reqwest` and an in-memory cache sized from `config`.
    pub fn new(config: OidcConfig) -> Result<Self, OidcError> {
        let http = ReqwestFetcher::with_limit(config.http_timeout(), config.http_max_body_bytes)?;
        let cache = MemoryJwksCache::new(config.jwks_cache_max_bytes);
        Ok(Self::with_parts(Arc::new(http), Arc::new(cache), config))
    }

    /// Parser over the given transport and cache.
    pub fn with_parts(
        http: Arc<dyn HttpFetcher>,
        cache: Arc<dyn JwksCache>,
        config: OidcConfig,
    ) -> Self {
        Self {
            http,
            cache,
            config,
        }
    }

    async fn discover(&self, issuer: &str) -> Result<String, OidcError> {
        let mut locations = vec![provider::oidc_well_known_url(issuer)];
        locations.extend(provider::oauth_well_known_url(issuer));

        let mut last_error = None;
        for location in locations {
            match self.fetch_metadata(&location).await {
                Ok(metadata) => {
                    if let Some(advertised) = metadata.issuer.as_deref() {
                        if advertised.trim_end_matches('/') != issuer.trim_end_matches('/') {
                            tracing::debug!(issuer, advertised, "metadata names a different issuer");
                        }
                    }
                    match metadata.jwks_uri.filter(|u| !u.is_empty()) {
                        Some(jwks_uri) => return Ok(jwks_uri),
                        None => last_error = Some(format!("{location}: no jwks_uri")),
                    }
                }
                Err(err) => {
                    tracing::debug!(location = %location, error = %err, "metadata lookup failed");
                    last_error = Some(err.to_string());
                }
            }
        }
        Err(OidcError::Discovery(format!(
            "{issuer}: {}",
            last_error.unwrap_or_else(|| "no metadata location".into())
        )))
    }

    async fn fetch_metadata(&self, location: &str) -> Result<ProviderMetadata, OidcError> {
        let response = self.http.get(location, &HeaderMap::new()).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| OidcError::Discovery(format!("{location}: invalid metadata: {e}")))
    }

    /// Fetch the key set and fingerprint its provider from the same response.
    async fn fetch_jwks(&self, jwks_uri: &str) -> Result<CachedJwks, OidcError> {
        let response = self.http.get(jwks_uri, &HeaderMap::new()).await?;
        let jwks: Jwks = serde_json::from_slice(&response.body)
            .map_err(|e| OidcError::InvalidJwks(format!("{jwks_uri}: {e}")))?;
        if jwks.is_empty() {
            return Err(OidcError::InvalidJwks(format!("{jwks_uri}: empty key set")));
        }
        let provider = Provider::detect(&response.headers, &response.url);
        Ok(CachedJwks { jwks, provider })
    }

    async fn fresh_keys(&self, issuer: &str, host: &str) -> Result<CachedJwks, OidcError> {
        let jwks_uri = self.discover(issuer).await?;
        let entry = self.fetch_jwks(&jwks_uri).await?;
        if entry.provider == Provider::Unknown {
            return Err(OidcError::UnknownProvider(host.to_string()));
        }
        self.cache
            .set(host, entry.clone(), self.config.jwks_cache_ttl())
            .await;
        Ok(entry)
    }

    async fn parse_federated(&self, jwt: &str, claims: Claims) -> Result<ParsedJwt, OidcError> {
        let host = net::hostname(&claims.issuer).ok_or_else(|| {
            OidcError::Discovery(format!("issuer {} is not a URL", claims.issuer))
        })?;

        let entry = match self.cache.get(&host).await {
            Some(cached) => match ident_crypto::verify_with_jwks(&cached.jwks, jwt) {
                Ok(_) => cached,
                Err(err) => {
                    tracing::debug!(host = %host, error = %err, "cached keys rejected token, refetching");
                    let fresh = self.fresh_keys(&claims.issuer, &host).await?;
                    ident_crypto::verify_with_jwks(&fresh.jwks, jwt)?;
                    fresh
                }
            },
            None => {
                let fresh = self.fresh_keys(&claims.issuer, &host).await?;
                ident_crypto::verify_with_jwks(&fresh.jwks, jwt)?;
                fresh
            }
        };

        tracing::debug!(host = %host, provider = %entry.provider, subject = %claims.subject, "verified federated proof");
        Ok(ParsedJwt {
            provider: entry.provider,
            claims,
            common_name: host,
            verified: entry.provider.is_federated(),
        })
    }
}

#[async_trait]
impl JwtParser for OidcParser {
    async fn parse_jwt(
        &self,
        jwt: &str,
        jwks_override: Option<&Jwks>,
    ) -> Result<ParsedJwt, OidcError> {
        let claims = self.peek_claims(jwt)?;

        match jwks_override {
            Some(jwks) => {
                ident_crypto::verify_with_jwks(jwks, jwt)?;
                tracing::debug!(issuer = %claims.issuer, subject = %claims.subject, "verified self-signed proof");
                Ok(ParsedJwt {
                    provider: Provider::SelfSigned,
                    common_name: claims.issuer.clone(),
                    claims,
                    verified: false,
                })
            }
            None => self.parse_federated(jwt, claims).await,
        }
    }

    fn peek_claims(&self, jwt: &str) -> Result<Claims, OidcError> {
        claims::peek_claims(jwt, self.config.leeway_secs)
    }
}
