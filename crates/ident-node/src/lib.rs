#![deny(missing_docs)]

//! # ident-node — Trust and Credential Services
//!
//! The chain of trust of the identity node:
//!
//! 1. An issuer registers a common name, proving control of it through a
//!    federated identity provider or its own key ([`IssuerService`]).
//! 2. Identifiers are minted for subjects authenticated under a registered
//!    issuer, each anchored by a resolver metadata document ([`IdService`]).
//! 3. Credentials about an identifier are published and verified against
//!    the keys that document lists ([`VcService`]).
//!
//! Every step re-authenticates through [`VerificationService`].
//!
//! ## Crate Policy
//!
//! - Operations fail fast with a [`NodeError`] and perform exactly one
//!   repository create, after every check has passed.
//! - Repository "not found" is the only storage error branched on; all
//!   others surface as [`NodeError::Internal`].
//! - No operation retries internally.
//!
//! [`NodeError`]: ident_core::NodeError
//! [`NodeError::Internal`]: ident_core::NodeError::Internal

pub mod config;
mod error;
pub mod id;
pub mod issuer;
pub mod memory;
pub mod node;
pub mod vc;
pub mod verification;

pub use config::NodeConfig;
pub use id::{IdGenerator, IdService};
pub use issuer::IssuerService;
pub use memory::{MemoryIdRepository, MemoryIssuerRepository, MemoryVcRepository, Store};
pub use node::Node;
pub use vc::VcService;
pub use verification::VerificationService;
