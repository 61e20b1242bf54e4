//! # Proofs
//!
//! A proof is a signed assertion offered with a request as evidence of
//! control over an issuer or subject identity. Proofs are never persisted on
//! their own.

use serde::{Deserialize, Serialize};

/// Proof type names accepted as a compact JWT.
pub const JWT_PROOF_TYPES: &[&str] = &["JWT", "JWTToken", "Jwk", "JwkToken", "JwtToken", "Jwt"];

/// Canonical proof type emitted for JOSE-enveloped credentials.
pub const JWT_PROOF_TYPE: &str = "JWT";

/// Evidence accompanying a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// One of [`JWT_PROOF_TYPES`] for a JWT proof.
    #[serde(rename = "type", default)]
    pub proof_type: String,
    /// Free-form purpose; unused by verification.
    #[serde(rename = "proofPurpose", default)]
    pub proof_purpose: String,
    /// The proof itself, e.g. a compact JWT.
    #[serde(rename = "proofValue", default)]
    pub proof_value: String,
}

impl Proof {
    /// A JWT proof carrying `token`.
    pub fn jwt(token: impl Into<String>) -> Self {
        Self {
            proof_type: JWT_PROOF_TYPE.to_string(),
            proof_purpose: String::new(),
            proof_value: token.into(),
        }
    }

    /// Whether the proof type names a JWT.
    pub fn is_jwt(&self) -> bool {
        JWT_PROOF_TYPES.contains(&self.proof_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_jwt_aliases() {
        for alias in JWT_PROOF_TYPES {
            let proof = Proof {
                proof_type: (*alias).to_string(),
                ..Proof::default()
            };
            assert!(proof.is_jwt(), "{alias}");
        }
    }

    #[test]
    fn rejects_other_types() {
        for other in ["", "COSE", "jwt", "Ed25519Signature2020"] {
            let proof = Proof {
                proof_type: other.to_string(),
                ..Proof::default()
            };
            assert!(!proof.is_jwt(), "{other}");
        }
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(Proof::jwt("a.b.c")).unwrap();
        assert_eq!(json["type"], "JWT");
        assert_eq!(json["proofValue"], "a.b.c");
        assert_eq!(json["proofPurpose"], "");
    }
}
