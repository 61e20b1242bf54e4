#![deny(missing_docs)]

//! # ident-crypto — JOSE Utilities for the Identity Node
//!
//! RSA key handling and compact JWS operations over JSON Web Keys.
//!
//! - [`keys`]: RS256/RS384/RS512 key generation (2048/3072/4096-bit moduli)
//!   and validation of public and private JWKs.
//! - [`jose`]: signing with a private JWK, verification against a key set,
//!   and unverified payload inspection.
//! - [`keystore`]: the private-key storage port.
//!
//! ## Crate Policy
//!
//! - Depends only on `ident-core` internally.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Private key material is never logged.

pub mod error;
pub mod jose;
pub mod keys;
pub mod keystore;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CryptoError;
pub use jose::{decode_unverified, sign, verify, verify_with_jwks};
pub use keys::{generate_jwk, validate_private_key, validate_public_key, RsaAlgorithm};
pub use keystore::{KeyStore, MemoryKeyStore};
