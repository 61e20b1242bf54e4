//! Shared fixtures for node integration tests.
//!
//! Identity providers are simulated by [`FakeIdp`], an `HttpFetcher` that
//! serves canned discovery documents and key sets for fixed URLs, with the
//! response headers each provider is fingerprinted by.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use ident_core::{Issuer, Jwk, Proof};
use ident_node::{MemoryIdRepository, MemoryIssuerRepository, MemoryVcRepository, Node, NodeConfig};
use ident_oidc::{HttpFetcher, HttpResponse, MemoryJwksCache, OidcConfig, OidcError, OidcParser};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, SERVER};
use serde_json::json;
use url::Url;

pub const OKTA_ISSUER: &str = "https://dev-1.okta.com";
pub const OKTA_HOST: &str = "dev-1.okta.com";
pub const DUO_ISSUER: &str = "https://sso-1.duosecurity.com/oidc/abc";
pub const DUO_HOST: &str = "sso-1.duosecurity.com";
pub const PLAIN_ISSUER: &str = "https://accounts.example.org";

fn key(slot: &'static OnceLock<Jwk>, kid: &str) -> &'static Jwk {
    slot.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", kid).unwrap())
}

/// Key of the simulated identity providers.
pub fn idp_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    key(&KEY, "idp-key")
}

/// Key an issuer registers and signs badges with.
pub fn issuer_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    key(&KEY, "issuer-key")
}

pub fn attacker_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    key(&KEY, "attacker-key")
}

#[derive(Default)]
pub struct FakeIdp {
    routes: RwLock<HashMap<String, (Vec<u8>, HeaderMap)>>,
    hits: RwLock<HashMap<String, usize>>,
}

impl FakeIdp {
    pub fn with_providers() -> Self {
        let idp = Self::default();
        idp.serve_provider(OKTA_ISSUER, &format!("{OKTA_ISSUER}/oauth2/v1/keys"), okta_headers());
        idp.serve_provider(DUO_ISSUER, &format!("{DUO_ISSUER}/jwks"), HeaderMap::new());
        let mut nginx = HeaderMap::new();
        nginx.insert(SERVER, HeaderValue::from_static("nginx"));
        idp.serve_provider(PLAIN_ISSUER, &format!("{PLAIN_ISSUER}/keys"), nginx);
        idp
    }

    pub fn serve_provider(&self, issuer: &str, jwks_uri: &str, headers: HeaderMap) {
        let metadata = json!({"issuer": issuer, "jwks_uri": jwks_uri});
        self.serve(
            &format!("{issuer}/.well-known/openid-configuration"),
            serde_json::to_vec(&metadata).unwrap(),
            HeaderMap::new(),
        );
        self.serve(
            jwks_uri,
            serde_json::to_vec(&idp_key().public_key().to_jwks()).unwrap(),
            headers,
        );
    }

    pub fn serve(&self, url: &str, body: Vec<u8>, headers: HeaderMap) {
        self.routes.write().insert(url.to_string(), (body, headers));
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.read().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HttpFetcher for FakeIdp {
    async fn get(&self, url: &str, _headers: &HeaderMap) -> Result<HttpResponse, OidcError> {
        *self.hits.write().entry(url.to_string()).or_default() += 1;
        let route = self.routes.read().get(url).cloned();
        let (body, headers) = route.ok_or_else(|| OidcError::Http(format!("GET {url} returned 404")))?;
        Ok(HttpResponse {
            body,
            headers,
            url: Url::parse(url).map_err(|e| OidcError::Http(e.to_string()))?,
        })
    }
}

fn okta_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-okta-request-id", HeaderValue::from_static("req-123"));
    headers
}

pub struct Harness {
    pub node: Node,
    pub idp: Arc<FakeIdp>,
    pub issuers: Arc<MemoryIssuerRepository>,
    pub ids: Arc<MemoryIdRepository>,
    pub vcs: Arc<MemoryVcRepository>,
}

pub fn harness() -> Harness {
    let idp = Arc::new(FakeIdp::with_providers());
    let parser = OidcParser::with_parts(
        idp.clone(),
        Arc::new(MemoryJwksCache::new(1024 * 1024)),
        OidcConfig::default(),
    );
    let issuers = Arc::new(MemoryIssuerRepository::new());
    let ids = Arc::new(MemoryIdRepository::new());
    let vcs = Arc::new(MemoryVcRepository::new());
    let node = Node::with_parts(
        Arc::new(parser),
        issuers.clone(),
        ids.clone(),
        vcs.clone(),
        &NodeConfig::default(),
    );
    Harness {
        node,
        idp,
        issuers,
        ids,
        vcs,
    }
}

/// A proof minted by the identity provider at `issuer_url`.
pub fn federated_proof(issuer_url: &str, subject: &str) -> Proof {
    let exp = chrono::Utc::now().timestamp() + 3600;
    let token = ident_crypto::sign(idp_key(), &json!({"iss": issuer_url, "sub": subject, "exp": exp}))
        .unwrap();
    Proof::jwt(token)
}

/// A proof the issuer `common_name` signs with `key`.
pub fn self_proof(common_name: &str, subject: &str, key: &Jwk) -> Proof {
    Proof::jwt(ident_oidc::self_issue_jwt(common_name, subject, key).unwrap())
}

pub fn issuer(common_name: &str) -> Issuer {
    Issuer::new(common_name, issuer_key().public_key()).with_organization("Example Corp", "Agents")
}

/// Register `common_name` anchored by its own key.
pub async fn register_self(h: &Harness, common_name: &str) -> Issuer {
    h.node
        .register(&issuer(common_name), Some(&self_proof(common_name, "admin", issuer_key())))
        .await
        .unwrap()
}

/// Register the host of `issuer_url` anchored by its identity provider.
pub async fn register_idp(h: &Harness, issuer_url: &str, host: &str) -> Issuer {
    h.node
        .register(&issuer(host), Some(&federated_proof(issuer_url, "admin")))
        .await
        .unwrap()
}
