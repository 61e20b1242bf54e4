//! Badge credentials: verifiable credentials describing an agent or an MCP
//! server.

use chrono::{SecondsFormat, Utc};
use ident_core::{CredentialSchema, VerifiableCredential};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// W3C credentials v2 context.
pub const CREDENTIALS_CONTEXT_V2: &str = "https://www.w3.org/ns/credentials/v2";
/// W3C credentials v2 examples context.
pub const CREDENTIALS_EXAMPLES_CONTEXT_V2: &str = "https://www.w3.org/ns/credentials/examples/v2";

/// Schema type used for `credentialSchema` entries.
pub const JSON_SCHEMA_TYPE: &str = "JsonSchema";

/// Kinds of badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeType {
    /// Describes an agent.
    AgentBadge,
    /// Describes an MCP server.
    #[serde(rename = "MCPServerBadge")]
    McpServerBadge,
}

impl BadgeType {
    /// The credential type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AgentBadge => "AgentBadge",
            Self::McpServerBadge => "MCPServerBadge",
        }
    }
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BadgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AgentBadge" => Ok(Self::AgentBadge),
            "MCPServerBadge" => Ok(Self::McpServerBadge),
            other => Err(format!("unknown badge type {other}")),
        }
    }
}

/// Build an unsigned badge issued by `issuer` about the identifier
/// `subject_id`.
///
/// `claims` become the credential subject; their `id` entry, if any, is
/// replaced by `subject_id`.
pub fn new_badge(
    issuer: &str,
    subject_id: &str,
    badge_type: BadgeType,
    mut claims: Map<String, Value>,
) -> VerifiableCredential {
    claims.insert("id".into(), Value::String(subject_id.to_string()));
    VerifiableCredential {
        context: vec![
            CREDENTIALS_CONTEXT_V2.to_string(),
            CREDENTIALS_EXAMPLES_CONTEXT_V2.to_string(),
        ],
        credential_type: vec![badge_type.to_string()],
        issuer: issuer.to_string(),
        credential_subject: claims,
        id: uuid::Uuid::new_v4().to_string(),
        issuance_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        ..VerifiableCredential::default()
    }
}

/// Attach JSON Schema references to `vc`.
pub fn with_schemas<I, S>(mut vc: VerifiableCredential, schemas: I) -> VerifiableCredential
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    vc.credential_schema.extend(schemas.into_iter().map(|id| CredentialSchema {
        schema_type: JSON_SCHEMA_TYPE.to_string(),
        id: id.into(),
    }));
    vc
}
