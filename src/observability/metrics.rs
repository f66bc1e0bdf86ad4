use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const OUTCOME_HIT: &str = "hit";
pub const OUTCOME_REFRESH: &str = "refresh";
pub const OUTCOME_FAILURE: &str = "failure";

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Supplier metrics
    pub token_requests: IntCounterVec,

    // IdP metrics
    pub idp_fetch_requests: IntCounter,
    pub idp_fetch_failures: IntCounterVec,
    pub idp_fetch_duration: Histogram,
    pub token_expires_in: IntGauge,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("subjecttoken".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "get_token calls by outcome (hit, refresh, failure)"),&["supplier", "outcome"],).unwrap(),

            idp_fetch_requests: IntCounter::new("idp_fetch_requests_total", "Token requests sent to the IdP").unwrap(),
            idp_fetch_failures: IntCounterVec::new(Opts::new("idp_fetch_failures_total", "IdP token request failures by kind"),&["kind"],).unwrap(),
            idp_fetch_duration: Histogram::with_opts(HistogramOpts::new("idp_fetch_duration_seconds", "IdP token request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).unwrap(),
            token_expires_in: IntGauge::new("token_expires_in_seconds", "expires_in of the last token received").unwrap(),

            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.idp_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.idp_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.idp_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_expires_in.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
