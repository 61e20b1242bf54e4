//! # Credential Envelopes
//!
//! Conversion between [`EnvelopedCredential`] and [`VerifiableCredential`].
//! Only the JOSE envelope is implemented: the value is a compact JWS whose
//! payload is the credential without its `proof`, and the parsed credential
//! keeps the JWS itself as a `JWT` proof.

use chrono::{DateTime, Utc};
use ident_core::{EnvelopeType, EnvelopedCredential, Jwk, Jwks, Proof, VerifiableCredential};
use ident_crypto::KeyStore;

use crate::error::VcError;

/// Parse an envelope into its credential without checking the signature.
pub fn parse(envelope: &EnvelopedCredential) -> Result<VerifiableCredential, VcError> {
    ensure_jose(envelope)?;

    let payload = ident_crypto::decode_unverified(&envelope.value)
        .map_err(|e| VcError::InvalidEnvelopeValue(e.to_string()))?;
    let mut vc: VerifiableCredential = serde_json::from_value(payload)
        .map_err(|e| VcError::InvalidEnvelopeValue(format!("payload is not a credential: {e}")))?;
    vc.proof = Some(Proof::jwt(envelope.value.clone()));
    Ok(vc)
}

/// Verify the envelope's signature against `jwks` and return the parsed
/// credential.
///
/// With `check_status`, a credential carrying a revocation status entry is
/// rejected. An `expirationDate` in the past is always rejected.
pub fn verify(
    envelope: &EnvelopedCredential,
    jwks: &Jwks,
    check_status: bool,
) -> Result<VerifiableCredential, VcError> {
    ensure_jose(envelope)?;
    ident_crypto::verify_with_jwks(jwks, &envelope.value).map_err(VcError::InvalidSignature)?;

    let vc = parse(envelope)?;
    if check_status && vc.is_revoked() {
        return Err(VcError::Revoked);
    }
    check_expiration(&vc, Utc::now())?;
    Ok(vc)
}

/// Sign `vc` with the private key `key` into a JOSE envelope.
///
/// Any `proof` already on the credential is left out of the payload.
pub fn issue(vc: &VerifiableCredential, key: &Jwk) -> Result<EnvelopedCredential, VcError> {
    if vc.did().is_none() {
        return Err(VcError::InvalidCredential(
            "the credential subject id is required".into(),
        ));
    }
    let mut payload = vc.clone();
    payload.proof = None;

    let token = ident_crypto::sign(key, &payload).map_err(VcError::Signing)?;
    tracing::debug!(id = %vc.id, subject = vc.did().unwrap_or_default(), "issued credential");
    Ok(EnvelopedCredential::jose(token))
}

/// Sign `vc` with the private key stored under `key_id` in `store`.
pub async fn issue_with_store(
    vc: &VerifiableCredential,
    store: &dyn KeyStore,
    key_id: &str,
) -> Result<EnvelopedCredential, VcError> {
    let key = store.retrieve_key(key_id).await.map_err(VcError::Signing)?;
    issue(vc, &key)
}

fn ensure_jose(envelope: &EnvelopedCredential) -> Result<(), VcError> {
    match envelope.envelope_type {
        EnvelopeType::Jose => Ok(()),
        EnvelopeType::EmbeddedProof => Err(VcError::InvalidEnvelopeType(
            "credential envelope type not implemented yet".into(),
        )),
        EnvelopeType::Unspecified => Err(VcError::InvalidEnvelopeType(
            "invalid credential envelope type".into(),
        )),
    }
}

fn check_expiration(vc: &VerifiableCredential, now: DateTime<Utc>) -> Result<(), VcError> {
    let Some(raw) = vc.expiration_date.as_deref().filter(|d| !d.is_empty()) else {
        return Ok(());
    };
    let expires_at = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| VcError::InvalidCredential(format!("invalid expirationDate {raw}: {e}")))?;
    if expires_at.with_timezone(&Utc) <= now {
        return Err(VcError::Expired(raw.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::{new_badge, BadgeType};
    use crate::testing::{other_key, test_key};
    use ident_core::{CredentialStatus, CredentialStatusPurpose};
    use serde_json::json;

    fn badge() -> VerifiableCredential {
        new_badge(
            "example.com",
            "AGNTCY-alice",
            BadgeType::AgentBadge,
            json!({"badge": "{\"name\":\"alice\"}"}).as_object().cloned().unwrap_or_default(),
        )
    }

    #[test]
    fn issue_then_verify_returns_credential_with_jwt_proof() {
        let vc = badge();
        let envelope = issue(&vc, test_key()).unwrap();
        assert_eq!(envelope.envelope_type, EnvelopeType::Jose);

        let verified = verify(&envelope, &test_key().public_key().to_jwks(), true).unwrap();
        assert_eq!(verified.did(), Some("AGNTCY-alice"));
        assert_eq!(verified.id, vc.id);
        let proof = verified.proof.unwrap();
        assert_eq!(proof.proof_type, "JWT");
        assert_eq!(proof.proof_value, envelope.value);
    }

    #[test]
    fn payload_excludes_existing_proof() {
        let mut vc = badge();
        vc.proof = Some(Proof::jwt("stale"));
        let envelope = issue(&vc, test_key()).unwrap();
        let payload = ident_crypto::decode_unverified(&envelope.value).unwrap();
        assert!(payload.get("proof").is_none());
        assert_eq!(payload["credentiaSubject"]["id"], "AGNTCY-alice");
    }

    #[test]
    fn foreign_key_fails_verification() {
        let envelope = issue(&badge(), other_key()).unwrap();
        let err = verify(&envelope, &test_key().public_key().to_jwks(), true).unwrap_err();
        assert!(matches!(err, VcError::InvalidSignature(_)));
    }

    #[test]
    fn revoked_credential_fails_only_with_status_check() {
        let mut vc = badge();
        vc.status.push(CredentialStatus {
            id: "status-1".into(),
            status_type: "StatusList2021Entry".into(),
            created_at: String::new(),
            purpose: CredentialStatusPurpose::Revocation,
        });
        let envelope = issue(&vc, test_key()).unwrap();
        let jwks = test_key().public_key().to_jwks();
        assert!(matches!(verify(&envelope, &jwks, true), Err(VcError::Revoked)));
        assert!(verify(&envelope, &jwks, false).is_ok());
    }

    #[test]
    fn expired_credential_fails() {
        let mut vc = badge();
        vc.expiration_date = Some("2020-01-01T00:00:00Z".into());
        let envelope = issue(&vc, test_key()).unwrap();
        let err = verify(&envelope, &test_key().public_key().to_jwks(), false).unwrap_err();
        assert!(matches!(err, VcError::Expired(_)));
    }

    #[test]
    fn future_expiration_is_accepted() {
        let mut vc = badge();
        vc.expiration_date = Some("2999-01-01T00:00:00Z".into());
        let envelope = issue(&vc, test_key()).unwrap();
        assert!(verify(&envelope, &test_key().public_key().to_jwks(), true).is_ok());
    }

    #[test]
    fn envelope_types_other_than_jose_are_rejected() {
        for envelope_type in [EnvelopeType::EmbeddedProof, EnvelopeType::Unspecified] {
            let envelope = EnvelopedCredential {
                envelope_type,
                value: "a.b.c".into(),
            };
            assert!(matches!(parse(&envelope), Err(VcError::InvalidEnvelopeType(_))));
            assert!(matches!(
                verify(&envelope, &Jwks::default(), true),
                Err(VcError::InvalidEnvelopeType(_))
            ));
        }
    }

    #[test]
    fn garbage_value_is_an_envelope_value_error() {
        for value in ["", "not-a-jws", "e30.bm90LWpzb24.c2ln"] {
            assert!(
                matches!(parse(&EnvelopedCredential::jose(value)), Err(VcError::InvalidEnvelopeValue(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn issue_requires_subject_id() {
        let mut vc = badge();
        vc.credential_subject.remove("id");
        assert!(matches!(issue(&vc, test_key()), Err(VcError::InvalidCredential(_))));
    }

    #[test]
    fn issue_requires_private_key() {
        assert!(matches!(
            issue(&badge(), &test_key().public_key()),
            Err(VcError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn issue_with_store_signs_with_the_stored_key() {
        let store = ident_crypto::MemoryKeyStore::new();
        store.store_key("issuer-1", test_key()).await.unwrap();

        let envelope = issue_with_store(&badge(), &store, "issuer-1").await.unwrap();
        let vc = verify(&envelope, &test_key().public_key().to_jwks(), true).unwrap();
        assert_eq!(vc.did(), Some("AGNTCY-alice"));

        let err = issue_with_store(&badge(), &store, "missing").await.unwrap_err();
        assert!(matches!(err, VcError::Signing(ident_crypto::CryptoError::KeyNotFound(_))));
    }

    #[test]
    fn verifies_payloads_in_either_subject_spelling() {
        for key in ["credentiaSubject", "credentialSubject"] {
            let mut payload = json!({
                "context": [crate::badge::CREDENTIALS_CONTEXT_V2],
                "type": ["AgentBadge"],
                "issuer": "example.com",
                "id": "vc-1",
                "issuanceDate": "2025-01-01T00:00:00Z",
            });
            payload[key] = json!({"id": "DUO-bob"});
            let token = ident_crypto::sign(test_key(), &payload).unwrap();
            let vc = verify(
                &EnvelopedCredential::jose(token),
                &test_key().public_key().to_jwks(),
                true,
            )
            .unwrap();
            assert_eq!(vc.did(), Some("DUO-bob"), "{key}");
        }
    }
}
