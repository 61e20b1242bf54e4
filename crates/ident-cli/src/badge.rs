//! # Badge Subcommands
//!
//! Offline issuance and verification of badge credentials in JOSE
//! envelopes.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use ident_core::{EnvelopedCredential, Jwks};
use ident_vc::BadgeType;
use serde_json::{Map, Value};

/// Arguments for `ident issue-badge`.
#[derive(Args, Debug)]
pub struct IssueBadgeArgs {
    /// Path to the issuer's private JWK file.
    #[arg(long)]
    pub key: PathBuf,
    /// Common name of the issuer.
    #[arg(long)]
    pub issuer: String,
    /// Identifier the badge is about.
    #[arg(long)]
    pub subject_id: String,
    /// Badge type: AgentBadge or MCPServerBadge.
    #[arg(long = "type")]
    pub badge_type: BadgeType,
    /// Credential subject claims as a JSON object.
    #[arg(long)]
    pub claims: Option<String>,
    /// JSON Schema reference for the credential. Repeatable.
    #[arg(long = "schema")]
    pub schemas: Vec<String>,
}

/// Arguments for `ident verify-badge`.
#[derive(Args, Debug)]
pub struct VerifyBadgeArgs {
    /// Path to the key set the badge must be signed by.
    #[arg(long)]
    pub jwks: PathBuf,
    /// Path to the enveloped credential.
    #[arg(long)]
    pub envelope: PathBuf,
}

/// Sign a new badge into an enveloped credential.
pub fn run_issue_badge(args: &IssueBadgeArgs) -> Result<String> {
    let key = crate::keys::read_private_key(&args.key)?;
    let claims = parse_claims(args.claims.as_deref())?;

    let vc = ident_vc::new_badge(&args.issuer, &args.subject_id, args.badge_type, claims);
    let vc = ident_vc::with_schemas(vc, args.schemas.iter().cloned());
    let envelope = ident_vc::issue(&vc, &key).context("failed to issue badge")?;

    tracing::info!(id = %vc.id, subject = %args.subject_id, badge_type = %args.badge_type, "issued badge");
    crate::to_json(&envelope)
}

/// Verify an enveloped credential and print the credential it carries.
pub fn run_verify_badge(args: &VerifyBadgeArgs) -> Result<String> {
    let jwks: Jwks = crate::read_json(&args.jwks)?;
    if jwks.is_empty() {
        bail!("{} contains no keys", args.jwks.display());
    }
    let envelope: EnvelopedCredential = crate::read_json(&args.envelope)?;

    let mut vc = ident_vc::verify(&envelope, &jwks, true).context("badge verification failed")?;
    vc.proof = None;
    tracing::info!(id = %vc.id, "badge verified");
    crate::to_json(&vc)
}

fn parse_claims(raw: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    match serde_json::from_str(raw).context("claims are not valid JSON")? {
        Value::Object(claims) => Ok(claims),
        _ => bail!("claims must be a JSON object"),
    }
}
