//! # Error Types — Node Error Taxonomy
//!
//! Every public node operation fails with a [`NodeError`]. Each variant is
//! one kind of failure a caller may branch on, and carries a human-readable
//! message. [`ErrorReason`] is the stable, serializable name of a kind, for
//! front ends that encode errors on the wire.
//!
//! ## Design
//!
//! - Operations fail fast on the first violated precondition.
//! - Storage failures other than "not found" are opaque and become
//!   [`NodeError::Internal`], keeping the source for diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for node operations.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Malformed or unverifiable proof, or a proof missing where required.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// The proof's identity provider could not be fingerprinted.
    #[error("unknown identity provider: {0}")]
    UnknownIdp(String),

    /// The proof's provider is inconsistent with how the issuer is anchored.
    #[error("identity provider required: {0}")]
    IdpRequired(String),

    /// Bad common name or public key, duplicate registration, or an issuer
    /// that does not match the verified proof.
    #[error("invalid issuer: {0}")]
    InvalidIssuer(String),

    /// No issuer is registered under the common name.
    #[error("issuer not registered: {0}")]
    IssuerNotRegistered(String),

    /// The identifier was minted before.
    #[error("id already registered: {0}")]
    IdAlreadyRegistered(String),

    /// The identifier resolves to nothing.
    #[error("resolver metadata not found: {0}")]
    ResolverMetadataNotFound(String),

    /// Unspecified or unimplemented envelope type.
    #[error("invalid credential envelope type: {0}")]
    InvalidCredentialEnvelopeType(String),

    /// The envelope value does not decode to a credential.
    #[error("invalid credential envelope value: {0}")]
    InvalidCredentialEnvelopeValueFormat(String),

    /// Missing subject id, ownership mismatch, bad signature, revoked or
    /// expired credential.
    #[error("invalid verifiable credential: {0}")]
    InvalidVerifiableCredential(String),

    /// Storage failure not otherwise classified.
    #[error("internal error: {message}")]
    Internal {
        /// What the node was doing.
        message: String,
        /// Underlying failure, kept for diagnostics.
        #[source]
        source: Option<BoxError>,
    },
}

impl NodeError {
    /// An internal error with no underlying cause.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// An internal error wrapping `source`.
    pub fn internal_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The stable reason code of this error.
    pub fn reason(&self) -> ErrorReason {
        match self {
            Self::InvalidProof(_) => ErrorReason::InvalidProof,
            Self::UnknownIdp(_) => ErrorReason::UnknownIdp,
            Self::IdpRequired(_) => ErrorReason::IdpRequired,
            Self::InvalidIssuer(_) => ErrorReason::InvalidIssuer,
            Self::IssuerNotRegistered(_) => ErrorReason::IssuerNotRegistered,
            Self::IdAlreadyRegistered(_) => ErrorReason::IdAlreadyRegistered,
            Self::ResolverMetadataNotFound(_) => ErrorReason::ResolverMetadataNotFound,
            Self::InvalidCredentialEnvelopeType(_) => ErrorReason::InvalidCredentialEnvelopeType,
            Self::InvalidCredentialEnvelopeValueFormat(_) => {
                ErrorReason::InvalidCredentialEnvelopeValueFormat
            }
            Self::InvalidVerifiableCredential(_) => ErrorReason::InvalidVerifiableCredential,
            Self::Internal { .. } => ErrorReason::Internal,
        }
    }

    /// The message without the reason prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidProof(m)
            | Self::UnknownIdp(m)
            | Self::IdpRequired(m)
            | Self::InvalidIssuer(m)
            | Self::IssuerNotRegistered(m)
            | Self::IdAlreadyRegistered(m)
            | Self::ResolverMetadataNotFound(m)
            | Self::InvalidCredentialEnvelopeType(m)
            | Self::InvalidCredentialEnvelopeValueFormat(m)
            | Self::InvalidVerifiableCredential(m) => m,
            Self::Internal { message, .. } => message,
        }
    }

    /// Transport-neutral rendering of this error.
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            reason: self.reason(),
            message: self.message().to_string(),
        }
    }
}

/// Stable reason codes, one per [`NodeError`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorReason {
    /// [`NodeError::Internal`].
    #[serde(rename = "ERROR_REASON_INTERNAL")]
    Internal,
    /// [`NodeError::InvalidProof`].
    #[serde(rename = "ERROR_REASON_INVALID_PROOF")]
    InvalidProof,
    /// [`NodeError::UnknownIdp`].
    #[serde(rename = "ERROR_REASON_UNKNOWN_IDP")]
    UnknownIdp,
    /// [`NodeError::IdpRequired`].
    #[serde(rename = "ERROR_REASON_IDP_REQUIRED")]
    IdpRequired,
    /// [`NodeError::InvalidIssuer`].
    #[serde(rename = "ERROR_REASON_INVALID_ISSUER")]
    InvalidIssuer,
    /// [`NodeError::IssuerNotRegistered`].
    #[serde(rename = "ERROR_REASON_ISSUER_NOT_REGISTERED")]
    IssuerNotRegistered,
    /// [`NodeError::IdAlreadyRegistered`].
    #[serde(rename = "ERROR_REASON_ID_ALREADY_REGISTERED")]
    IdAlreadyRegistered,
    /// [`NodeError::ResolverMetadataNotFound`].
    #[serde(rename = "ERROR_REASON_RESOLVER_METADATA_NOT_FOUND")]
    ResolverMetadataNotFound,
    /// [`NodeError::InvalidCredentialEnvelopeType`].
    #[serde(rename = "ERROR_REASON_INVALID_CREDENTIAL_ENVELOPE_TYPE")]
    InvalidCredentialEnvelopeType,
    /// [`NodeError::InvalidCredentialEnvelopeValueFormat`].
    #[serde(rename = "ERROR_REASON_INVALID_CREDENTIAL_ENVELOPE_VALUE_FORMAT")]
    InvalidCredentialEnvelopeValueFormat,
    /// [`NodeError::InvalidVerifiableCredential`].
    #[serde(rename = "ERROR_REASON_INVALID_VERIFIABLE_CREDENTIAL")]
    InvalidVerifiableCredential,
}

/// Serializable error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kind of failure.
    pub reason: ErrorReason,
    /// Human-readable detail.
    pub message: String,
}
