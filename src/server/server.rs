use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::{header::CONTENT_TYPE, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::settings::{MetricsConfig, SettingsConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::supplier::{SubjectTokenSupplier, SupplierContext};
use crate::utils::constants::{DEFAULT_HEALTH_PATH, DEFAULT_TOKEN_PATH};

pub struct AppState<S> {
    pub metrics_state: MetricsState,
    pub supplier: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            metrics_state: self.metrics_state.clone(),
            supplier: self.supplier.clone(),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(metrics: &Metrics, supplier: Arc<S>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            supplier,
        }
    }
}

/// Optional request context forwarded to the supplier.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub audience: Option<String>,
    pub subject_token_type: Option<String>,
}

impl From<TokenQuery> for SupplierContext {
    fn from(query: TokenQuery) -> Self {
        SupplierContext::new(
            query.audience.unwrap_or_default(),
            query.subject_token_type.unwrap_or_default(),
        )
    }
}

pub fn router<S>(state: AppState<S>, metrics_config: &MetricsConfig) -> Router
where
    S: SubjectTokenSupplier + 'static,
{
    Router::new()
        .route(DEFAULT_TOKEN_PATH, get(handle_token::<S>))
        .route(DEFAULT_HEALTH_PATH, get(|| async { "ok" }))
        .merge(state.metrics_state.router::<S>(metrics_config))
        .with_state(state)
}

/// Serve tokens over HTTP on `settings.server`.
pub async fn start<S>(settings_config: &SettingsConfig, supplier: Arc<S>) -> Result<()>
where
    S: SubjectTokenSupplier + 'static,
{
    let server = settings_config
        .server
        .as_ref()
        .context("settings.server is required to serve tokens")?;

    let metrics = get_metrics().await;
    let state = AppState::new(metrics, supplier);
    let app = router(state, &settings_config.metrics);

    let bind_addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", bind_addr))?;
    info!("serving subject tokens on {}{}", bind_addr, DEFAULT_TOKEN_PATH);

    metrics.up.set(1);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    metrics.up.set(0);
    served.context("http server failed")
}

async fn handle_token<S>(State(state): State<AppState<S>>, Query(query): Query<TokenQuery>) -> Response
where
    S: SubjectTokenSupplier + 'static,
{
    let context = SupplierContext::from(query);
    match state.supplier.get_token(&context).await {
        Ok(token) => (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], token).into_response(),
        Err(e) => {
            warn!(kind = e.kind().as_str(), "token request could not be served: {}", e);
            let status = if e.is_retryable() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, e.to_string()).into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down http server");
}
