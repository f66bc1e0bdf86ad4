//! Subject token suppliers handed to the federation credential exchange.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::config::ServiceConfig;
use crate::errors::RefreshError;
use crate::sources::{ClientCredentialsFetcher, FetchToken};

pub mod caching;
pub mod direct;

pub use caching::CachingSupplier;
pub use direct::DirectSupplier;

/// Request details the federation framework passes along with each call.
///
/// Suppliers forward it untouched; nothing in this crate inspects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierContext {
    pub audience: String,
    pub subject_token_type: String,
}

impl SupplierContext {
    pub fn new(audience: impl Into<String>, subject_token_type: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            subject_token_type: subject_token_type.into(),
        }
    }
}

/// Source of subject tokens for a workload identity federation exchange.
pub trait SubjectTokenSupplier: Send + Sync {
    fn get_token(
        &self,
        context: &SupplierContext,
    ) -> impl Future<Output = Result<String, RefreshError>> + Send;
}

#[derive(Debug)]
pub enum SupplierKind<F> {
    Caching(CachingSupplier<F>),
    Direct(DirectSupplier<F>),
}

impl<F> SupplierKind<F> {
    pub fn name(&self) -> &'static str {
        match self {
            SupplierKind::Caching(_) => caching::SUPPLIER_NAME,
            SupplierKind::Direct(_) => direct::SUPPLIER_NAME,
        }
    }
}

impl<F> SubjectTokenSupplier for SupplierKind<F>
where
    F: FetchToken + Send + Sync,
{
    async fn get_token(&self, context: &SupplierContext) -> Result<String, RefreshError> {
        match self {
            SupplierKind::Caching(s) => s.get_token(context).await,
            SupplierKind::Direct(s) => s.get_token(context).await,
        }
    }
}

/// Build the supplier described by `cfg` on top of a Client Credentials fetcher.
pub fn build_supplier(cfg: &ServiceConfig) -> Result<SupplierKind<ClientCredentialsFetcher>> {
    let fetcher = ClientCredentialsFetcher::from_config(&cfg.settings.http)?;
    let credentials = cfg.credentials.clone();

    let supplier = if cfg.supplier.caching {
        let margin = Duration::from_secs(cfg.supplier.refresh_margin_seconds);
        SupplierKind::Caching(CachingSupplier::new(fetcher, credentials).with_refresh_margin(margin))
    } else {
        SupplierKind::Direct(DirectSupplier::new(fetcher, credentials))
    };
    info!(supplier = supplier.name(), issuer = %cfg.credentials.issuer_url, "subject token supplier built");
    Ok(supplier)
}
