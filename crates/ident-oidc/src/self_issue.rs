//! Self-issued proofs: JWTs an issuer signs with its own registered key
//! instead of obtaining them from an identity provider.

use chrono::{Duration, Utc};
use ident_core::Jwk;
use ident_crypto::CryptoError;
use serde::Serialize;

/// Claim carrying the signer's public key.
pub const SUB_JWK_CLAIM: &str = "sub_jwk";

/// Lifetime of a self-issued proof.
pub const SELF_ISSUED_TTL_SECS: i64 = 3600;

#[derive(Serialize)]
struct SelfIssuedClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: [&'a str; 1],
    iat: i64,
    exp: i64,
    jti: String,
    sub_jwk: Jwk,
}

/// Sign a one-hour proof asserting `subject` under the issuer `common_name`.
///
/// `key` must be the issuer's private key; its public half is embedded as
/// `sub_jwk`.
pub fn self_issue_jwt(common_name: &str, subject: &str, key: &Jwk) -> Result<String, CryptoError> {
    let now = Utc::now();
    let claims = SelfIssuedClaims {
        iss: common_name,
        sub: subject,
        aud: [subject],
        iat: now.timestamp(),
        exp: (now + Duration::seconds(SELF_ISSUED_TTL_SECS)).timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
        sub_jwk: key.public_key(),
    };
    ident_crypto::sign(key, &claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::peek_claims;
    use std::sync::OnceLock;

    fn key() -> &'static Jwk {
        static KEY: OnceLock<Jwk> = OnceLock::new();
        KEY.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", "issuer-key").unwrap())
    }

    #[test]
    fn proof_verifies_with_the_public_key() {
        let token = self_issue_jwt("example.com", "alice", key()).unwrap();
        ident_crypto::verify(&key().public_key(), &token).unwrap();

        let claims = peek_claims(&token, 0).unwrap();
        assert_eq!(claims.issuer, "example.com");
        assert_eq!(claims.subject, "alice");
    }

    #[test]
    fn proof_embeds_public_key_only() {
        let token = self_issue_jwt("example.com", "alice", key()).unwrap();
        let payload = ident_crypto::decode_unverified(&token).unwrap();
        let embedded: Jwk = serde_json::from_value(payload[SUB_JWK_CLAIM].clone()).unwrap();
        assert!(!embedded.is_private());
        assert_eq!(embedded, key().public_key());
        assert_eq!(payload["aud"][0], "alice");
        let lifetime = payload["exp"].as_i64().unwrap() - payload["iat"].as_i64().unwrap();
        assert_eq!(lifetime, SELF_ISSUED_TTL_SECS);
    }

    #[test]
    fn each_proof_is_unique() {
        let a = self_issue_jwt("example.com", "alice", key()).unwrap();
        let b = self_issue_jwt("example.com", "alice", key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn requires_private_key() {
        assert!(self_issue_jwt("example.com", "alice", &key().public_key()).is_err());
    }
}
