use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, info_span, Instrument, Span};

use crate::cache::token::{CachedToken, TokenState};
use crate::errors::RefreshError;
use crate::helpers::time::{expires_at, get_instant};
use crate::observability::metrics::{get_metrics, OUTCOME_FAILURE, OUTCOME_HIT, OUTCOME_REFRESH};
use crate::sources::{Credentials, FetchToken};
use crate::supplier::{SubjectTokenSupplier, SupplierContext};

pub const SUPPLIER_NAME: &str = "caching";

/// Serves one cached subject token and refreshes it through `F` once expired.
///
/// Within a token's validity window no request reaches the IdP. A failed
/// refresh leaves the cached token as it was and returns the error.
///
/// Token and expiry are stored as one [`CachedToken`] value behind `slot`, so
/// readers never see a token paired with another token's expiry. The
/// `refresh_lock` only keeps concurrent callers from sending duplicate
/// requests to the IdP; returned values are correct without it.
#[derive(Debug)]
pub struct CachingSupplier<F> {
    fetcher: F,
    credentials: Credentials,
    slot: RwLock<Option<CachedToken>>,
    refresh_lock: Mutex<()>,
    refresh_margin: Duration,
    span: Span,
}

impl<F: FetchToken> CachingSupplier<F> {
    pub fn new(fetcher: F, credentials: Credentials) -> Self {
        let span = info_span!("subject_token_supplier", supplier = SUPPLIER_NAME, issuer = %credentials.issuer_url);
        Self {
            fetcher,
            credentials,
            slot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refresh_margin: Duration::ZERO,
            span,
        }
    }

    /// Treat tokens as expired `margin` before their actual expiry.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Emit this supplier's events inside `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn state(&self) -> TokenState {
        let slot = self.slot.read().await;
        TokenState::of(slot.as_ref(), get_instant(), self.refresh_margin)
    }

    async fn refresh(&self) -> Result<String, RefreshError> {
        let _refresh = self.refresh_lock.lock().await;

        // another caller may have refreshed while this one waited
        let state = self.state().await;
        if let TokenState::Valid(token) = &state {
            return Ok(token.clone());
        }
        info!(reason = state.reason(), "OIDC token missing or expired");

        let response = self.fetcher.fetch(&self.credentials).await.inspect_err(|e| {
            error!(error = %e, "failed retrieving new OIDC token from IdP");
        })?;

        let cached = CachedToken::new(
            response.access_token.clone(),
            expires_at(get_instant(), response.expires_in),
        );
        *self.slot.write().await = Some(cached);

        info!(expires_in = response.expires_in, "new OIDC token retrieved, expires in {} seconds", response.expires_in);
        Ok(response.access_token)
    }
}

impl<F> SubjectTokenSupplier for CachingSupplier<F>
where
    F: FetchToken + Send + Sync,
{
    async fn get_token(&self, _context: &SupplierContext) -> Result<String, RefreshError> {
        let metrics = get_metrics().await;

        if let TokenState::Valid(token) = self.state().await {
            metrics.token_requests.with_label_values(&[SUPPLIER_NAME, OUTCOME_HIT]).inc();
            return Ok(token);
        }

        let result = self.refresh().instrument(self.span.clone()).await;
        let outcome = if result.is_ok() { OUTCOME_REFRESH } else { OUTCOME_FAILURE };
        metrics.token_requests.with_label_values(&[SUPPLIER_NAME, outcome]).inc();
        result
    }
}
