//! Tests for OidcParser against a mocked identity provider.
//!
//! Each test starts a wiremock server that plays the issuer: it serves the
//! discovery document and the JWKS endpoint, with response headers chosen
//! to fingerprint a particular provider.

use std::sync::OnceLock;

use ident_core::{Jwk, Jwks};
use ident_oidc::{JwtParser, OidcConfig, OidcError, OidcParser, Provider};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn key_a() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", "key-a").unwrap())
}

fn key_b() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", "key-b").unwrap())
}

fn jwks_of(key: &Jwk) -> Jwks {
    key.public_key().to_jwks()
}

fn token(key: &Jwk, iss: &str, sub: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    ident_crypto::sign(key, &json!({"iss": iss, "sub": sub, "exp": exp})).unwrap()
}

fn parser() -> OidcParser {
    OidcParser::new(OidcConfig::default()).unwrap()
}

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": server.uri(),
            "jwks_uri": format!("{}/keys", server.uri()),
        })))
        .mount(server)
        .await;
}

fn jwks_response(key: &Jwk) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(jwks_of(key))
}

#[tokio::test]
async fn okta_proof_is_verified_through_discovery() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()).insert_header("x-okta-request-id", "req-1"))
        .mount(&server)
        .await;

    let parsed = parser()
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap();

    assert_eq!(parsed.provider, Provider::Okta);
    assert_eq!(parsed.common_name, "127.0.0.1");
    assert_eq!(parsed.claims.subject, "alice");
    assert!(parsed.verified);
}

#[tokio::test]
async fn duo_is_detected_from_server_header() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()).insert_header("server", "Duo/2.1"))
        .mount(&server)
        .await;

    let parsed = parser()
        .parse_jwt(&token(key_a(), &server.uri(), "bob"), None)
        .await
        .unwrap();
    assert_eq!(parsed.provider, Provider::Duo);
}

#[tokio::test]
async fn unrecognized_provider_is_rejected() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()))
        .mount(&server)
        .await;

    let err = parser()
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, OidcError::UnknownProvider(ref host) if host == "127.0.0.1"), "{err}");
}

#[tokio::test]
async fn falls_back_to_oauth_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/oauth-authorization-server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": server.uri(),
            "jwks_uri": format!("{}/oauth/keys", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth/keys"))
        .respond_with(jwks_response(key_a()).insert_header("x-okta-request-id", "req-2"))
        .mount(&server)
        .await;

    let parsed = parser()
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap();
    assert_eq!(parsed.provider, Provider::Okta);
}

#[tokio::test]
async fn missing_metadata_is_a_discovery_failure() {
    let server = MockServer::start().await;
    let err = parser()
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, OidcError::Discovery(_)), "{err}");
}

#[tokio::test]
async fn cache_hit_skips_discovery_and_jwks_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": server.uri(),
            "jwks_uri": format!("{}/keys", server.uri()),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()).insert_header("x-okta-request-id", "req-3"))
        .expect(1)
        .mount(&server)
        .await;

    let parser = parser();
    for sub in ["alice", "bob", "carol"] {
        let parsed = parser
            .parse_jwt(&token(key_a(), &server.uri(), sub), None)
            .await
            .unwrap();
        assert_eq!(parsed.provider, Provider::Okta);
        assert_eq!(parsed.claims.subject, sub);
    }
}

#[tokio::test]
async fn rotated_keys_are_refetched_once() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()).insert_header("x-okta-request-id", "old"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_b()).insert_header("x-okta-request-id", "new"))
        .mount(&server)
        .await;

    let parser = parser();
    parser
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap();
    let parsed = parser
        .parse_jwt(&token(key_b(), &server.uri(), "alice"), None)
        .await
        .unwrap();
    assert_eq!(parsed.provider, Provider::Okta);
}

#[tokio::test]
async fn signature_from_foreign_key_is_rejected() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(jwks_response(key_a()).insert_header("x-okta-request-id", "req-4"))
        .mount(&server)
        .await;

    let err = parser()
        .parse_jwt(&token(key_b(), &server.uri(), "mallory"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, OidcError::InvalidSignature(_)), "{err}");
}

#[tokio::test]
async fn self_signed_proof_uses_override_and_raw_issuer() {
    let parsed = parser()
        .parse_jwt(&token(key_a(), "example.com", "alice"), Some(&jwks_of(key_a())))
        .await
        .unwrap();

    assert_eq!(parsed.provider, Provider::SelfSigned);
    assert_eq!(parsed.common_name, "example.com");
    assert!(!parsed.verified);
}

#[tokio::test]
async fn self_signed_proof_with_wrong_key_is_rejected() {
    let err = parser()
        .parse_jwt(&token(key_b(), "example.com", "alice"), Some(&jwks_of(key_a())))
        .await
        .unwrap_err();
    assert!(matches!(err, OidcError::InvalidSignature(_)), "{err}");
}

#[tokio::test]
async fn expired_proof_is_rejected_before_any_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let exp = chrono::Utc::now().timestamp() - 3600;
    let expired = ident_crypto::sign(key_a(), &json!({"iss": server.uri(), "sub": "alice", "exp": exp}))
        .unwrap();
    let err = parser().parse_jwt(&expired, None).await.unwrap_err();
    assert!(matches!(err, OidcError::InvalidClaims(_)), "{err}");
}

#[tokio::test]
async fn proof_without_subject_is_rejected() {
    let jwt = ident_crypto::sign(key_a(), &json!({"iss": "example.com"})).unwrap();
    let err = parser().parse_jwt(&jwt, Some(&jwks_of(key_a()))).await.unwrap_err();
    assert!(matches!(err, OidcError::MissingClaim("sub")), "{err}");
}

#[tokio::test]
async fn oversized_key_set_is_never_parsed() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    let padding = "k".repeat(4096);
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"keys": jwks_of(key_a()).keys, "padding": padding}))
                .insert_header("x-okta-request-id", "req-1"),
        )
        .mount(&server)
        .await;

    let config = OidcConfig {
        http_max_body_bytes: 2048,
        ..OidcConfig::default()
    };
    let err = OidcParser::new(config)
        .unwrap()
        .parse_jwt(&token(key_a(), &server.uri(), "alice"), None)
        .await
        .unwrap_err();
    assert!(matches!(&err, OidcError::Http(msg) if msg.contains("exceeds")), "{err}");
}
