//! # JSON Web Keys
//!
//! Wire shapes for RFC 7517 keys and key sets. Field names are the
//! registered JWK parameter names and round-trip unchanged through JSON,
//! so stored issuer keys and resolver documents remain interoperable.
//!
//! Only the parameters used by this system are modelled. Every field is
//! optional on the wire and omitted when absent.

use serde::{Deserialize, Serialize};

/// A single JSON Web Key, public or private.
///
/// `Debug` redacts private material so keys can be logged safely.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Signing algorithm, e.g. `RS256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Key type, e.g. `RSA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Intended use, `sig` for signing keys.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Public key for OKP-style keys.
    #[serde(rename = "pub", default, skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
    /// Private key for OKP-style keys.
    #[serde(rename = "priv", default, skip_serializing_if = "Option::is_none")]
    pub private: Option<String>,
    /// Key generation seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// RSA public exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// RSA modulus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA private exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// RSA first prime factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    /// RSA second prime factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// RSA first factor CRT exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    /// RSA second factor CRT exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    /// RSA first CRT coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl Jwk {
    /// Whether any private parameter is present.
    pub fn is_private(&self) -> bool {
        self.private_fields().iter().any(|f| f.is_some())
    }

    /// The public half of this key. Private parameters are dropped; the
    /// key identifier, algorithm and intended use are kept.
    pub fn public_key(&self) -> Jwk {
        Jwk {
            alg: self.alg.clone(),
            kty: self.kty.clone(),
            key_use: self.key_use.clone(),
            kid: self.kid.clone(),
            public: self.public.clone(),
            e: self.e.clone(),
            n: self.n.clone(),
            ..Jwk::default()
        }
    }

    /// Wrap this key into a one-key set.
    pub fn to_jwks(&self) -> Jwks {
        Jwks {
            keys: vec![self.clone()],
        }
    }

    /// The key identifier, or the empty string when unset.
    pub fn kid_or_empty(&self) -> &str {
        self.kid.as_deref().unwrap_or_default()
    }

    fn private_fields(&self) -> [&Option<String>; 8] {
        [
            &self.private,
            &self.seed,
            &self.d,
            &self.p,
            &self.q,
            &self.dp,
            &self.dq,
            &self.qi,
        ]
    }
}

impl std::fmt::Debug for Jwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = if self.is_private() {
            Some("[REDACTED]")
        } else {
            None
        };
        f.debug_struct("Jwk")
            .field("alg", &self.alg)
            .field("kty", &self.kty)
            .field("use", &self.key_use)
            .field("kid", &self.kid)
            .field("n", &self.n)
            .field("e", &self.e)
            .field("private", &redacted)
            .finish()
    }
}

/// A JSON Web Key Set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    /// Keys in the set.
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Look up a key by `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// Whether the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
