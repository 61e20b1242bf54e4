//! Shared test keys. RSA generation is slow, so each key is generated once
//! per test binary.

use std::sync::OnceLock;

use ident_core::Jwk;

use crate::keys::generate_jwk;

pub(crate) fn test_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| generate_jwk("RS256", "sig", "test-key").unwrap())
}

pub(crate) fn other_key() -> &'static Jwk {
    static KEY: OnceLock<Jwk> = OnceLock::new();
    KEY.get_or_init(|| generate_jwk("RS256", "sig", "other-key").unwrap())
}
