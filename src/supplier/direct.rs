use tracing::{error, info_span, Instrument, Span};

use crate::errors::RefreshError;
use crate::observability::metrics::{get_metrics, OUTCOME_FAILURE, OUTCOME_REFRESH};
use crate::sources::{Credentials, FetchToken};
use crate::supplier::{SubjectTokenSupplier, SupplierContext};

pub const SUPPLIER_NAME: &str = "direct";

/// Requests a fresh token from the IdP on every call.
#[derive(Debug)]
pub struct DirectSupplier<F> {
    fetcher: F,
    credentials: Credentials,
    span: Span,
}

impl<F: FetchToken> DirectSupplier<F> {
    pub fn new(fetcher: F, credentials: Credentials) -> Self {
        let span = info_span!("subject_token_supplier", supplier = SUPPLIER_NAME, issuer = %credentials.issuer_url);
        Self { fetcher, credentials, span }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl<F> SubjectTokenSupplier for DirectSupplier<F>
where
    F: FetchToken + Send + Sync,
{
    async fn get_token(&self, _context: &SupplierContext) -> Result<String, RefreshError> {
        let metrics = get_metrics().await;
        let result = self
            .fetcher
            .fetch(&self.credentials)
            .instrument(self.span.clone())
            .await;

        match result {
            Ok(response) => {
                metrics.token_requests.with_label_values(&[SUPPLIER_NAME, OUTCOME_REFRESH]).inc();
                Ok(response.access_token)
            }
            Err(e) => {
                self.span.in_scope(|| error!(error = %e, "failed retrieving OIDC token from IdP"));
                metrics.token_requests.with_label_values(&[SUPPLIER_NAME, OUTCOME_FAILURE]).inc();
                Err(e)
            }
        }
    }
}
