//! # RSA JSON Web Keys
//!
//! Generation and validation of RSA keys in JWK form. Issuers register a
//! public JWK; signers hold the private JWK with every CRT parameter set.
//!
//! ## Security Invariant
//!
//! A key accepted by [`validate_private_key`] has passed RSA consistency
//! checks (`n = p·q`, `d` inverts `e`, CRT values agree). Signing only ever
//! goes through that path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ident_core::Jwk;
use jsonwebtoken::Algorithm;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey};

use crate::error::CryptoError;

/// `kty` of every generated key.
pub const KEY_TYPE_RSA: &str = "RSA";
/// `use` of signing keys.
pub const USE_SIGNATURE: &str = "sig";

/// The RSA PKCS#1 v1.5 signature algorithms this system issues and accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsaAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    Rs256,
    /// RSASSA-PKCS1-v1_5 with SHA-384.
    Rs384,
    /// RSASSA-PKCS1-v1_5 with SHA-512.
    Rs512,
}

impl RsaAlgorithm {
    /// Parse a JOSE `alg` name.
    pub fn parse(name: &str) -> Result<Self, CryptoError> {
        match name {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// The JOSE `alg` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }

    /// Modulus size used when generating a key for this algorithm.
    pub fn modulus_bits(self) -> usize {
        match self {
            Self::Rs256 => 2048,
            Self::Rs384 => 3072,
            Self::Rs512 => 4096,
        }
    }

    pub(crate) fn jwt_algorithm(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::Rs384 => Algorithm::RS384,
            Self::Rs512 => Algorithm::RS512,
        }
    }

    pub(crate) fn from_jwt_algorithm(alg: Algorithm) -> Result<Self, CryptoError> {
        match alg {
            Algorithm::RS256 => Ok(Self::Rs256),
            Algorithm::RS384 => Ok(Self::Rs384),
            Algorithm::RS512 => Ok(Self::Rs512),
            other => Err(CryptoError::UnsupportedAlgorithm(format!("{other:?}"))),
        }
    }
}

impl std::fmt::Display for RsaAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RsaAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a private RSA JWK for `alg` (`RS256`, `RS384` or `RS512`).
///
/// The key carries `alg`, `kty`, `use` and `kid` along with every private
/// and CRT parameter.
pub fn generate_jwk(alg: &str, key_use: &str, kid: &str) -> Result<Jwk, CryptoError> {
    let alg = RsaAlgorithm::parse(alg)?;
    tracing::debug!(alg = %alg, bits = alg.modulus_bits(), "generating RSA key");

    let key = RsaPrivateKey::new(&mut rand::rngs::OsRng, alg.modulus_bits())
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let mut jwk = private_jwk(&key)?;
    jwk.alg = Some(alg.as_str().to_string());
    jwk.key_use = Some(if key_use.is_empty() { USE_SIGNATURE } else { key_use }.to_string());
    jwk.kid = (!kid.is_empty()).then(|| kid.to_string());
    Ok(jwk)
}

fn private_jwk(key: &RsaPrivateKey) -> Result<Jwk, CryptoError> {
    let missing = |what: &str| CryptoError::KeyGeneration(format!("missing {what}"));
    let primes = key.primes();
    let p = primes.first().ok_or_else(|| missing("p"))?;
    let q = primes.get(1).ok_or_else(|| missing("q"))?;
    let dp = key.dp().ok_or_else(|| missing("dp"))?;
    let dq = key.dq().ok_or_else(|| missing("dq"))?;
    let qi = key.crt_coefficient().ok_or_else(|| missing("qi"))?;

    Ok(Jwk {
        kty: Some(KEY_TYPE_RSA.to_string()),
        n: Some(encode_uint(key.n())),
        e: Some(encode_uint(key.e())),
        d: Some(encode_uint(key.d())),
        p: Some(encode_uint(p)),
        q: Some(encode_uint(q)),
        dp: Some(encode_uint(dp)),
        dq: Some(encode_uint(dq)),
        qi: Some(encode_uint(&qi)),
        ..Jwk::default()
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `jwk` is a usable RSA public key with no private material.
///
/// `n` and `e` must be present, unpadded base64url, and strictly positive.
pub fn validate_public_key(jwk: &Jwk) -> Result<(), CryptoError> {
    ensure_rsa(jwk)?;
    if jwk.is_private() {
        return Err(CryptoError::InvalidKey(
            "private key fields must not be present in a public key".into(),
        ));
    }
    for (name, value) in [("n", &jwk.n), ("e", &jwk.e)] {
        if decode_bytes(name, value)?.iter().all(|b| *b == 0) {
            return Err(CryptoError::InvalidKey(format!("{name} must be positive")));
        }
    }
    Ok(())
}

/// Check that `jwk` is a complete, consistent RSA private key.
pub fn validate_private_key(jwk: &Jwk) -> Result<(), CryptoError> {
    rsa_private_key(jwk).map(|_| ())
}

/// Rebuild and validate the RSA private key described by `jwk`.
pub(crate) fn rsa_private_key(jwk: &Jwk) -> Result<RsaPrivateKey, CryptoError> {
    ensure_rsa(jwk)?;
    let n = decode_uint("n", &jwk.n)?;
    let e = decode_uint("e", &jwk.e)?;
    let d = decode_uint("d", &jwk.d)?;
    let p = decode_uint("p", &jwk.p)?;
    let q = decode_uint("q", &jwk.q)?;
    let dp = decode_uint("dp", &jwk.dp)?;
    let dq = decode_uint("dq", &jwk.dq)?;
    let qi = decode_uint("qi", &jwk.qi)?;

    let invalid = |e: rsa::Error| CryptoError::InvalidKey(format!("invalid RSA private key: {e}"));
    let mut key = RsaPrivateKey::from_components(n, e, d, vec![p, q]).map_err(invalid)?;
    key.validate().map_err(invalid)?;
    key.precompute().map_err(invalid)?;

    if key.dp() != Some(&dp) || key.dq() != Some(&dq) || key.crt_coefficient() != Some(qi) {
        return Err(CryptoError::InvalidKey(
            "CRT parameters do not match the key".into(),
        ));
    }
    Ok(key)
}

fn ensure_rsa(jwk: &Jwk) -> Result<(), CryptoError> {
    match jwk.kty.as_deref() {
        Some(kty) if kty.eq_ignore_ascii_case(KEY_TYPE_RSA) => Ok(()),
        Some(kty) => Err(CryptoError::InvalidKey(format!("unsupported key type {kty}"))),
        None => Err(CryptoError::InvalidKey("missing key type".into())),
    }
}

fn decode_bytes(name: &str, value: &Option<String>) -> Result<Vec<u8>, CryptoError> {
    let raw = value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CryptoError::InvalidKey(format!("missing {name}")))?;
    URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|_| CryptoError::InvalidKey(format!("invalid base64url encoding for {name}")))
}

fn decode_uint(name: &str, value: &Option<String>) -> Result<BigUint, CryptoError> {
    decode_bytes(name, value).map(|bytes| BigUint::from_bytes_be(&bytes))
}

fn encode_uint(value: &BigUint) -> String {
    URL_SAFE_NO_PAD.encode(value.to_bytes_be())
}
