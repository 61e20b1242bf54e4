//! Parser configuration.
//!
//! Defaults match production expectations. Override via environment
//! variables or explicit construction for tests.

use std::time::Duration;

use crate::error::ConfigError;

/// Default for [`OidcConfig::http_timeout_secs`].
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Default for [`OidcConfig::http_max_body_bytes`].
pub const DEFAULT_HTTP_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default for [`OidcConfig::jwks_cache_ttl_secs`].
pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
/// Default for [`OidcConfig::jwks_cache_max_bytes`].
pub const DEFAULT_JWKS_CACHE_MAX_BYTES: usize = 10 * 1024 * 1024;
/// Default for [`OidcConfig::leeway_secs`].
pub const DEFAULT_LEEWAY_SECS: u64 = 5;

/// Network, cache and clock settings of an [`OidcParser`](crate::OidcParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcConfig {
    /// Timeout for each discovery or JWKS request.
    pub http_timeout_secs: u64,
    /// Largest discovery or JWKS response body read before giving up.
    pub http_max_body_bytes: usize,
    /// How long a fetched key set is served from cache.
    pub jwks_cache_ttl_secs: u64,
    /// Upper bound on the serialized size of all cached key sets.
    pub jwks_cache_max_bytes: usize,
    /// Clock skew tolerated on `exp` and `nbf`.
    pub leeway_secs: u64,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            http_max_body_bytes: DEFAULT_HTTP_MAX_BODY_BYTES,
            jwks_cache_ttl_secs: DEFAULT_JWKS_CACHE_TTL_SECS,
            jwks_cache_max_bytes: DEFAULT_JWKS_CACHE_MAX_BYTES,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }
}

impl OidcConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `IDENT_HTTP_TIMEOUT_SECS` (default: 10)
    /// - `IDENT_HTTP_MAX_BODY_BYTES` (default: 1048576)
    /// - `IDENT_JWKS_CACHE_TTL_SECS` (default: 86400)
    /// - `IDENT_JWKS_CACHE_MAX_BYTES` (default: 10485760)
    /// - `IDENT_JWT_LEEWAY_SECS` (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            http_timeout_secs: env_parse("IDENT_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            http_max_body_bytes: env_parse(
                "IDENT_HTTP_MAX_BODY_BYTES",
                DEFAULT_HTTP_MAX_BODY_BYTES,
            )?,
            jwks_cache_ttl_secs: env_parse(
                "IDENT_JWKS_CACHE_TTL_SECS",
                DEFAULT_JWKS_CACHE_TTL_SECS,
            )?,
            jwks_cache_max_bytes: env_parse(
                "IDENT_JWKS_CACHE_MAX_BYTES",
                DEFAULT_JWKS_CACHE_MAX_BYTES,
            )?,
            leeway_secs: env_parse("IDENT_JWT_LEEWAY_SECS", DEFAULT_LEEWAY_SECS)?,
        })
    }

    /// [`http_timeout_secs`](Self::http_timeout_secs) as a `Duration`.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// [`jwks_cache_ttl_secs`](Self::jwks_cache_ttl_secs) as a `Duration`.
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }
}

/// Parse `var` if set, falling back to `default` when absent.
pub fn env_parse<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
