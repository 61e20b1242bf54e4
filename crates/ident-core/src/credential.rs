//! # Verifiable Credentials
//!
//! Badge credentials and their wire envelope. A credential targets exactly
//! one identifier through the subject's `id`; the rest of the subject is
//! an open JSON object whose shape depends on the badge type.
//!
//! Records are stored as parsed credentials with the original compact JWS
//! kept in `proof.proofValue`, so the envelope can be reproduced verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::proof::Proof;

/// How a credential is wrapped for transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvelopeType {
    /// Data Integrity proof embedded in the document. Not supported.
    #[serde(rename = "CREDENTIAL_ENVELOPE_TYPE_EMBEDDED_PROOF")]
    EmbeddedProof,
    /// Compact JWS whose payload is the credential.
    #[serde(rename = "CREDENTIAL_ENVELOPE_TYPE_JOSE")]
    Jose,
    /// Also the value of any unrecognized type name.
    #[serde(rename = "CREDENTIAL_ENVELOPE_TYPE_UNSPECIFIED")]
    #[default]
    #[serde(other)]
    Unspecified,
}

/// The wire and storage form of a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopedCredential {
    /// How `value` is to be read.
    #[serde(rename = "envelopeType", default)]
    pub envelope_type: EnvelopeType,
    /// The enveloped credential; a compact JWS for [`EnvelopeType::Jose`].
    #[serde(default)]
    pub value: String,
}

impl EnvelopedCredential {
    /// A JOSE envelope around the compact JWS `value`.
    pub fn jose(value: impl Into<String>) -> Self {
        Self {
            envelope_type: EnvelopeType::Jose,
            value: value.into(),
        }
    }
}

/// Schema a credential claims to conform to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSchema {
    /// Schema language, e.g. `JsonSchema`.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Location of the schema.
    pub id: String,
}

/// What a status entry asserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStatusPurpose {
    /// The credential is revoked.
    #[serde(rename = "CREDENTIAL_STATUS_PURPOSE_REVOCATION")]
    Revocation,
    /// Also the value of any unrecognized purpose name.
    #[serde(rename = "CREDENTIAL_STATUS_PURPOSE_UNSPECIFIED")]
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A status entry attached to a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatus {
    /// Status entry identifier.
    #[serde(default)]
    pub id: String,
    /// Status mechanism, e.g. `StatusList2021Entry`.
    #[serde(rename = "type", default)]
    pub status_type: String,
    /// When the entry was recorded.
    #[serde(rename = "createdAt", default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    /// What the entry asserts.
    #[serde(default)]
    pub purpose: CredentialStatusPurpose,
}

/// A W3C-style verifiable credential.
///
/// The subject is written as `credentiaSubject`, the key stored records and
/// signed payloads of existing nodes use. `credentialSubject` is accepted on
/// input; when both keys are present `credentiaSubject` wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CredentialRecord")]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "context")]
    pub context: Vec<String>,
    /// Credential types; badges carry exactly one.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    /// Common name of the issuing issuer.
    pub issuer: String,
    /// Subject claims. `id` names the identifier the credential is about.
    #[serde(rename = "credentiaSubject")]
    pub credential_subject: Map<String, Value>,
    /// Credential identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// RFC 3339 issuance time.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: String,
    /// RFC 3339 expiry; absent means the credential does not expire.
    #[serde(rename = "expirationDate", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Schemas the subject claims conform to.
    #[serde(rename = "credentialSchema", skip_serializing_if = "Vec::is_empty")]
    pub credential_schema: Vec<CredentialSchema>,
    /// Status entries, e.g. revocation.
    #[serde(rename = "credentialStatus", skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<CredentialStatus>,
    /// Set on parse to the JWS the credential was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// Input shape of [`VerifiableCredential`], tolerant of both subject keys.
#[derive(Deserialize)]
struct CredentialRecord {
    #[serde(rename = "context", alias = "@context", default)]
    context: Vec<String>,
    #[serde(rename = "type", default)]
    credential_type: Vec<String>,
    #[serde(default)]
    issuer: String,
    #[serde(rename = "credentiaSubject", default)]
    stored_subject: Option<Map<String, Value>>,
    #[serde(rename = "credentialSubject", default)]
    w3c_subject: Option<Map<String, Value>>,
    #[serde(default)]
    id: String,
    #[serde(rename = "issuanceDate", default)]
    issuance_date: String,
    #[serde(rename = "expirationDate", default)]
    expiration_date: Option<String>,
    #[serde(rename = "credentialSchema", default)]
    credential_schema: Vec<CredentialSchema>,
    #[serde(rename = "credentialStatus", default)]
    status: Vec<CredentialStatus>,
    #[serde(default)]
    proof: Option<Proof>,
}

impl From<CredentialRecord> for VerifiableCredential {
    fn from(record: CredentialRecord) -> Self {
        Self {
            context: record.context,
            credential_type: record.credential_type,
            issuer: record.issuer,
            credential_subject: record
                .stored_subject
                .or(record.w3c_subject)
                .unwrap_or_default(),
            id: record.id,
            issuance_date: record.issuance_date,
            expiration_date: record.expiration_date,
            credential_schema: record.credential_schema,
            status: record.status,
            proof: record.proof,
        }
    }
}

impl VerifiableCredential {
    /// The resolver-metadata identifier this credential is about, taken
    /// from the subject's `id`. Empty and non-string values count as
    /// absent.
    pub fn did(&self) -> Option<&str> {
        match self.credential_subject.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// Whether a revocation status entry is present.
    pub fn is_revoked(&self) -> bool {
        self.status
            .iter()
            .any(|s| s.purpose == CredentialStatusPurpose::Revocation)
    }
}

/// Outcome of a successful credential verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Always `true`; failures are errors.
    pub status: bool,
    /// The verified credential.
    pub document: VerifiableCredential,
    /// Common name of the issuer controlling the subject identifier.
    pub controller: String,
    /// The subject identifier.
    #[serde(rename = "controlledIdentifierDocument")]
    pub controlled_identifier_document: String,
    /// Media type of the result, `application/vp`.
    #[serde(rename = "mediaType")]
    pub media_type: String,
}
