//! # Compact JWS over JWKs
//!
//! Signing with a private [`Jwk`] and verification against a [`Jwks`]. Only
//! the RSA PKCS#1 v1.5 family is accepted: a token whose header names any
//! other algorithm fails before a key is touched.
//!
//! ## Key Selection
//!
//! When the token header carries a `kid`, only keys with that `kid` are
//! tried. Without one, every RSA key in the set is tried. Keys whose own
//! `alg` or `use` contradict the token are skipped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ident_core::{Jwk, Jwks};
use jsonwebtoken::{DecodingKey, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use serde::Serialize;

use crate::error::CryptoError;
use crate::keys::{self, RsaAlgorithm, KEY_TYPE_RSA, USE_SIGNATURE};

/// The three segments of a compact JWS.
struct CompactJws<'a> {
    signing_input: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> CompactJws<'a> {
    fn split(token: &'a str) -> Result<Self, CryptoError> {
        let malformed = || CryptoError::MalformedToken("expected three dot-separated segments".into());
        let (signing_input, signature) = token.rsplit_once('.').ok_or_else(malformed)?;
        let (header, payload) = signing_input.split_once('.').ok_or_else(malformed)?;
        if header.is_empty() || signature.is_empty() || payload.contains('.') {
            return Err(malformed());
        }
        Ok(Self {
            signing_input,
            payload,
            signature,
        })
    }

    fn payload_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        URL_SAFE_NO_PAD
            .decode(self.payload)
            .map_err(|e| CryptoError::MalformedToken(format!("payload is not base64url: {e}")))
    }
}

/// Sign `payload` as a compact JWS with the private key `key`.
///
/// The header carries the key's `alg` (default `RS256`) and `kid`.
pub fn sign<T: Serialize>(key: &Jwk, payload: &T) -> Result<String, CryptoError> {
    let alg = RsaAlgorithm::parse(key.alg.as_deref().unwrap_or("RS256"))?;
    let private = keys::rsa_private_key(key)?;
    let der = private
        .to_pkcs1_der()
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

    let mut header = Header::new(alg.jwt_algorithm());
    header.kid = key.kid.clone();
    jsonwebtoken::encode(&header, payload, &encoding_key)
        .map_err(|e| CryptoError::Signing(e.to_string()))
}

/// Verify `token` against a single public key, returning the raw payload.
pub fn verify(key: &Jwk, token: &str) -> Result<Vec<u8>, CryptoError> {
    verify_with_jwks(&key.to_jwks(), token)
}

/// Verify `token` against any suitable key in `jwks`, returning the raw
/// payload of the first key that verifies it.
pub fn verify_with_jwks(jwks: &Jwks, token: &str) -> Result<Vec<u8>, CryptoError> {
    let jws = CompactJws::split(token)?;
    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| CryptoError::MalformedToken(format!("invalid header: {e}")))?;
    let alg = RsaAlgorithm::from_jwt_algorithm(header.alg)?;

    let candidates: Vec<&Jwk> = match header.kid.as_deref() {
        Some(kid) => jwks
            .keys
            .iter()
            .filter(|k| k.kid.as_deref() == Some(kid))
            .collect(),
        None => jwks.keys.iter().collect(),
    };
    if candidates.is_empty() {
        return Err(CryptoError::VerificationFailed(match header.kid {
            Some(kid) => format!("no key with kid {kid}"),
            None => "empty key set".into(),
        }));
    }

    for key in candidates.into_iter().filter(|k| accepts(k, alg)) {
        let (Some(n), Some(e)) = (key.n.as_deref(), key.e.as_deref()) else {
            continue;
        };
        let decoding_key = match DecodingKey::from_rsa_components(n, e) {
            Ok(k) => k,
            Err(err) => {
                tracing::debug!(kid = key.kid_or_empty(), error = %err, "skipping unusable key");
                continue;
            }
        };
        match jsonwebtoken::crypto::verify(
            jws.signature,
            jws.signing_input.as_bytes(),
            &decoding_key,
            alg.jwt_algorithm(),
        ) {
            Ok(true) => return jws.payload_bytes(),
            Ok(false) => continue,
            Err(err) => {
                tracing::debug!(kid = key.kid_or_empty(), error = %err, "signature check errored");
                continue;
            }
        }
    }

    Err(CryptoError::VerificationFailed(
        "no key in the set verifies the signature".into(),
    ))
}

/// Decode the payload of `token` as JSON without checking its signature.
pub fn decode_unverified(token: &str) -> Result<serde_json::Value, CryptoError> {
    let payload = CompactJws::split(token)?.payload_bytes()?;
    serde_json::from_slice(&payload)
        .map_err(|e| CryptoError::MalformedToken(format!("payload is not JSON: {e}")))
}

fn accepts(key: &Jwk, alg: RsaAlgorithm) -> bool {
    let kty_ok = key
        .kty
        .as_deref()
        .map_or(true, |kty| kty.eq_ignore_ascii_case(KEY_TYPE_RSA));
    let alg_ok = key.alg.as_deref().map_or(true, |a| a == alg.as_str());
    let use_ok = key.key_use.as_deref().map_or(true, |u| u == USE_SIGNATURE);
    kty_ok && alg_ok && use_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{other_key, test_key};
    use proptest::prelude::*;
    use serde_json::json;

    fn flip_signature_bit(token: &str, bit: usize) -> String {
        let (input, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        let idx = bit % (bytes.len() * 8);
        bytes[idx / 8] ^= 1 << (idx % 8);
        format!("{input}.{}", URL_SAFE_NO_PAD.encode(bytes))
    }

    #[test]
    fn sign_then_verify_returns_payload() {
        let claims = json!({"iss": "example.com", "sub": "alice"});
        let token = sign(test_key(), &claims).unwrap();
        let payload = verify(&test_key().public_key(), &token).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn header_carries_alg_and_kid() {
        let token = sign(test_key(), &json!({})).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key"));
    }

    #[test]
    fn wrong_key_fails() {
        let token = sign(test_key(), &json!({"a": 1})).unwrap();
        let mut wrong = other_key().public_key();
        wrong.kid = test_key().kid.clone();
        assert!(matches!(
            verify(&wrong, &token),
            Err(CryptoError::VerificationFailed(_))
        ));
    }

    #[test]
    fn kid_mismatch_fails_even_with_right_material() {
        let token = sign(test_key(), &json!({"a": 1})).unwrap();
        let mut renamed = test_key().public_key();
        renamed.kid = Some("elsewhere".into());
        let err = verify(&renamed, &token).unwrap_err();
        assert!(err.to_string().contains("no key with kid test-key"));
    }

    #[test]
    fn verifies_against_multi_key_set() {
        let token = sign(test_key(), &json!({"a": 1})).unwrap();
        let jwks = Jwks {
            keys: vec![other_key().public_key(), test_key().public_key()],
        };
        assert!(verify_with_jwks(&jwks, &token).is_ok());
    }

    #[test]
    fn key_with_conflicting_alg_is_skipped() {
        let token = sign(test_key(), &json!({"a": 1})).unwrap();
        let mut key = test_key().public_key();
        key.alg = Some("RS512".into());
        assert!(verify(&key, &token).is_err());
    }

    #[test]
    fn rejects_non_rsa_algorithms() {
        let hs = jsonwebtoken::encode(
            &Header::default(),
            &json!({"a": 1}),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(
            verify(&test_key().public_key(), &hs),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn malformed_tokens() {
        for token in ["", "abc", "a.b", ".b.c", "a.b.", "a.b.c.d"] {
            assert!(
                matches!(verify(&test_key().public_key(), token), Err(CryptoError::MalformedToken(_))),
                "{token}"
            );
        }
    }

    #[test]
    fn decode_unverified_reads_payload() {
        let token = sign(test_key(), &json!({"iss": "x"})).unwrap();
        assert_eq!(decode_unverified(&token).unwrap()["iss"], "x");
    }

    #[test]
    fn sign_requires_private_key() {
        let err = sign(&test_key().public_key(), &json!({})).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn flipping_any_signature_bit_fails(bit in 0usize..2048) {
            let token = sign(test_key(), &json!({"credentialSubject": {"id": "AGNTCY-alice"}})).unwrap();
            let tampered = flip_signature_bit(&token, bit);
            prop_assert!(verify(&test_key().public_key(), &tampered).is_err());
        }
    }
}
