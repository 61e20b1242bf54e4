#![deny(missing_docs)]

//! # ident-core — Foundational Types for the Identity Node
//!
//! Data model, error taxonomy and storage ports shared by every other crate
//! in the workspace. It depends on nothing internal.
//!
//! ## Contents
//!
//! - [`jwk`]: JSON Web Keys and key sets, byte-compatible with stored data.
//! - [`issuer`], [`proof`], [`resolver`], [`credential`]: the records the
//!   node registers, mints, publishes and resolves.
//! - [`error`]: [`NodeError`], one variant per failure kind a caller may
//!   branch on, with stable [`ErrorReason`] codes.
//! - [`repository`]: async storage ports implemented by backends.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ident-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Wire field names are fixed; renaming a serde field is a breaking change.

pub mod credential;
pub mod error;
pub mod issuer;
pub mod jwk;
pub mod net;
pub mod proof;
pub mod repository;
pub mod resolver;

pub use credential::{
    CredentialSchema, CredentialStatus, CredentialStatusPurpose, EnvelopeType,
    EnvelopedCredential, VerifiableCredential, VerificationResult,
};
pub use error::{ErrorInfo, ErrorReason, NodeError};
pub use issuer::{AuthType, Issuer};
pub use jwk::{Jwk, Jwks};
pub use proof::Proof;
pub use repository::{IdRepository, IssuerRepository, RepositoryError, VcRepository};
pub use resolver::{ResolverMetadata, Service, VerificationMethod};
