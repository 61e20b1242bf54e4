#![deny(missing_docs)]

//! # ident-oidc — Proof Parsing and Provider Detection
//!
//! Verifies the JWT proofs that issuers present to the node and attributes
//! each one to an identity provider.
//!
//! ## Modules
//!
//! - [`claims`]: unverified `iss`/`sub` inspection with time-claim checks.
//! - [`parser`]: [`OidcParser`], discovery, JWKS retrieval and signature
//!   verification behind the [`JwtParser`] port.
//! - [`provider`]: the closed [`Provider`] set and its fingerprinting.
//! - [`cache`]: TTL- and size-bounded JWKS cache behind [`JwksCache`].
//! - [`http`]: the [`HttpFetcher`] port and its `reqwest` implementation.
//! - [`self_issue`]: proofs signed with an issuer's own key.
//!
//! ## Crate Policy
//!
//! - Trust decisions match on [`Provider`]; provider names are never
//!   compared as strings.
//! - All network access goes through [`HttpFetcher`]. Dropping a parse
//!   future cancels any request in flight.

pub mod cache;
pub mod claims;
pub mod config;
pub mod error;
pub mod http;
pub mod parser;
pub mod provider;
pub mod self_issue;

pub use cache::{CachedJwks, JwksCache, MemoryJwksCache};
pub use claims::{peek_claims, Claims};
pub use config::OidcConfig;
pub use error::{ConfigError, OidcError};
pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};
pub use parser::{JwtParser, OidcParser, ParsedJwt};
pub use provider::Provider;
pub use self_issue::self_issue_jwt;
