//! Node configuration.

use ident_oidc::config::env_parse;
use ident_oidc::{ConfigError, OidcConfig};

/// Default for [`NodeConfig::service_scheme`].
pub const DEFAULT_SERVICE_SCHEME: &str = "https";

/// Settings of a [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Proof parser settings.
    pub oidc: OidcConfig,
    /// Scheme of the service endpoint advertised for IdP-anchored issuers.
    pub service_scheme: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            oidc: OidcConfig::default(),
            service_scheme: DEFAULT_SERVICE_SCHEME.to_string(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads everything [`OidcConfig::from_env`] reads, plus
    /// `IDENT_SERVICE_SCHEME` (`http` or `https`, default: `https`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_scheme: String =
            env_parse("IDENT_SERVICE_SCHEME", DEFAULT_SERVICE_SCHEME.to_string())?;
        Ok(Self {
            oidc: OidcConfig::from_env()?,
            service_scheme: validate_scheme(service_scheme)?,
        })
    }
}

fn validate_scheme(scheme: String) -> Result<String, ConfigError> {
    let scheme = scheme.to_ascii_lowercase();
    match scheme.as_str() {
        "http" | "https" => Ok(scheme),
        _ => Err(ConfigError::Invalid(
            "IDENT_SERVICE_SCHEME".into(),
            format!("expected http or https, got {scheme}"),
        )),
    }
}
