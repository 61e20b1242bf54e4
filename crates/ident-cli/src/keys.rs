//! # Key Subcommands
//!
//! RSA JWK generation and self-issued registration proofs.
//!
//! ## Security Invariant
//!
//! Private keys are only ever written to stdout as the output of `keygen`.
//! They are never logged, and every command that reads one validates it
//! before use.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ident_core::Jwk;

/// Arguments for `ident keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Signing algorithm: RS256, RS384 or RS512.
    #[arg(long, default_value = "RS256")]
    pub alg: String,
    /// Key identifier. A random UUID when omitted.
    #[arg(long)]
    pub kid: Option<String>,
}

/// Arguments for `ident public-key`.
#[derive(Args, Debug)]
pub struct PublicKeyArgs {
    /// Path to a JWK file.
    #[arg(long)]
    pub key: PathBuf,
}

/// Arguments for `ident self-issue`.
#[derive(Args, Debug)]
pub struct SelfIssueArgs {
    /// Path to the issuer's private JWK file.
    #[arg(long)]
    pub key: PathBuf,
    /// Common name of the issuer.
    #[arg(long)]
    pub issuer: String,
    /// Subject the proof authenticates.
    #[arg(long)]
    pub subject: String,
}

/// Generate a private JWK.
pub fn run_keygen(args: &KeygenArgs) -> Result<String> {
    let kid = args
        .kid
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let jwk = ident_crypto::generate_jwk(&args.alg, "sig", &kid)
        .with_context(|| format!("failed to generate {} key", args.alg))?;
    tracing::info!(alg = %args.alg, kid = %kid, "generated key");
    crate::to_json(&jwk)
}

/// Print the public half of a JWK.
pub fn run_public_key(args: &PublicKeyArgs) -> Result<String> {
    let jwk: Jwk = crate::read_json(&args.key)?;
    let public = jwk.public_key();
    ident_crypto::validate_public_key(&public).context("invalid key")?;
    crate::to_json(&public)
}

/// Mint a self-signed proof JWT.
pub fn run_self_issue(args: &SelfIssueArgs) -> Result<String> {
    let jwk = read_private_key(&args.key)?;
    let token = ident_oidc::self_issue_jwt(&args.issuer, &args.subject, &jwk)
        .context("failed to sign proof")?;
    tracing::info!(issuer = %args.issuer, subject = %args.subject, "self-issued proof");
    Ok(token)
}

/// Read a JWK file that must hold a valid private key.
pub fn read_private_key(path: &Path) -> Result<Jwk> {
    let jwk: Jwk = crate::read_json(path)?;
    if !jwk.is_private() {
        bail!("{} does not contain a private key", path.display());
    }
    ident_crypto::validate_private_key(&jwk)
        .with_context(|| format!("invalid private key: {}", path.display()))?;
    Ok(jwk)
}
