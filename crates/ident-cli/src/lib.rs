#![deny(missing_docs)]

//! # ident-cli — Operator Tool for the Identity Node
//!
//! Provides the `ident` command-line interface. Every subcommand works
//! offline on local files and prints a JSON document (or a compact JWT) to
//! stdout; logs go to stderr.
//!
//! ## Subcommands
//!
//! - `ident keygen` — Generate a private RSA JWK.
//! - `ident public-key` — Print the public half of a JWK.
//! - `ident self-issue` — Mint a self-signed proof for issuer registration.
//! - `ident issue-badge` — Sign a badge credential into a JOSE envelope.
//! - `ident verify-badge` — Verify an envelope against a key set.
//!
//! ```bash
//! ident keygen --kid issuer-1 > issuer.jwk
//! ident self-issue --key issuer.jwk --issuer example.com --subject alice
//! ident issue-badge --key issuer.jwk --issuer example.com \
//!     --subject-id AGNTCY-alice --type AgentBadge > badge.json
//! ident public-key --key issuer.jwk | jq '{keys: [.]}' > jwks.json
//! ident verify-badge --jwks jwks.json --envelope badge.json
//! ```

pub mod badge;
pub mod keys;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Render `value` as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
