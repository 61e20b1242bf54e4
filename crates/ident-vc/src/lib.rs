#![deny(missing_docs)]

//! # ident-vc — Verifiable Credential Primitives
//!
//! Badges are W3C-style verifiable credentials signed by an issuer key and
//! carried as a JOSE envelope (a compact JWS over the credential JSON).
//!
//! - [`envelope`]: parse, verify and issue envelopes, signing with a key
//!   held directly or in a [`KeyStore`](ident_crypto::KeyStore).
//! - [`badge`]: construct agent and MCP-server badges.
//!
//! ## Security Invariant
//!
//! [`envelope::parse`] never establishes trust. Only [`envelope::verify`],
//! given the key set of the identifier the credential is about, does.

pub mod badge;
pub mod envelope;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use badge::{new_badge, with_schemas, BadgeType};
pub use envelope::{issue, issue_with_store, parse, verify};
pub use error::VcError;
