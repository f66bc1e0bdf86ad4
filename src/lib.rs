//! # Subject Token Supplier
//!
//! Supplies OIDC subject tokens to a workload identity federation exchange.
//! Tokens come from an external IdP through the OAuth2 Client Credentials
//! Grant and are cached until they expire.
//!
//! Modules:
//! - `sources`: credentials and the Client Credentials token fetcher
//! - `supplier`: the `SubjectTokenSupplier` trait, caching and direct suppliers
//! - `cache`: the single-slot cached token and its state
//! - `errors`: `RefreshError`, the unified refresh failure
//! - `config`: YAML service configuration, loading and validation
//! - `server` / `observability`: HTTP token endpoint and prometheus metrics

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod sources;
pub mod supplier;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::ServiceConfig;
pub use crate::errors::RefreshError;
pub use crate::sources::{ClientCredentialsFetcher, Credentials, FetchToken, TokenResponse};
pub use crate::supplier::{CachingSupplier, DirectSupplier, SubjectTokenSupplier, SupplierContext};
