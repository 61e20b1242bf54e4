//! # ident CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ident_cli::badge::{run_issue_badge, run_verify_badge, IssueBadgeArgs, VerifyBadgeArgs};
use ident_cli::keys::{
    run_keygen, run_public_key, run_self_issue, KeygenArgs, PublicKeyArgs, SelfIssueArgs,
};

/// Identity node operator tool.
///
/// Generates issuer keys, mints self-signed registration proofs, and
/// issues and verifies badge credentials offline.
#[derive(Parser, Debug)]
#[command(name = "ident", version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a private RSA JWK.
    Keygen(KeygenArgs),

    /// Print the public half of a JWK.
    PublicKey(PublicKeyArgs),

    /// Mint a self-signed proof JWT for an issuer.
    SelfIssue(SelfIssueArgs),

    /// Sign a badge credential into a JOSE envelope.
    IssueBadge(IssueBadgeArgs),

    /// Verify an enveloped badge against a key set.
    VerifyBadge(VerifyBadgeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match &cli.command {
        Commands::Keygen(args) => run_keygen(args),
        Commands::PublicKey(args) => run_public_key(args),
        Commands::SelfIssue(args) => run_self_issue(args),
        Commands::IssueBadge(args) => run_issue_badge(args),
        Commands::VerifyBadge(args) => run_verify_badge(args),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
