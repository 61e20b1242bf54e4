//! Shared test keys, generated once per test binary.

use std::sync::OnceLock;

use ident_core::Jwk;

pub(crate) fn test_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", "vc-key").unwrap())
}

/// Shares `test_key`'s kid, so verification reaches the signature check.
pub(crate) fn other_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| ident_crypto::generate_jwk("RS256", "sig", "vc-key").unwrap())
}
