//! Configuration validation with aggregated errors.
//! Every problem found is reported, not only the first one.

use crate::config::settings::SettingsConfig;
use crate::config::types::{ServiceConfig, SupplierConfig};
use crate::sources::Credentials;
use crate::utils::constants::{DEFAULT_HEALTH_PATH, DEFAULT_TOKEN_PATH, MAX_TOKEN_LIFETIME_SECS};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_supplier(&cfg.supplier, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_credentials(credentials: &Credentials, errors: &mut Vec<String>) {
    let url = &credentials.issuer_url;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!(
            "credentials.issuer_url '{}' must be an http(s) URL",
            url
        ));
    }
    if credentials.client_id.trim().is_empty() {
        errors.push("credentials.client_id must not be empty".to_string());
    }
    if credentials.client_secret.is_empty() {
        errors.push("credentials.client_secret must not be empty".to_string());
    }
    for key in credentials.reserved_extra_params() {
        errors.push(format!(
            "credentials.extra_params.{} overrides a fixed grant field",
            key
        ));
    }
}

fn validate_supplier(supplier: &SupplierConfig, errors: &mut Vec<String>) {
    if supplier.refresh_margin_seconds > MAX_TOKEN_LIFETIME_SECS as u64 {
        errors.push(format!(
            "supplier.refresh_margin_seconds ({}) is unreasonably large",
            supplier.refresh_margin_seconds
        ));
    }
    if !supplier.caching && supplier.refresh_margin_seconds > 0 {
        errors.push("supplier.refresh_margin_seconds has no effect when caching is disabled".to_string());
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be greater than 0".to_string());
    }

    if let Some(server) = &settings.server {
        if server.host.is_empty() {
            errors.push("settings.server.host must not be empty".to_string());
        }
        if server.port.parse::<u16>().is_err() {
            errors.push(format!(
                "settings.server.port '{}' must be an integer in range 0-65535",
                server.port
            ));
        }
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }
    if metrics.is_enabled && [DEFAULT_TOKEN_PATH, DEFAULT_HEALTH_PATH].contains(&metrics.path.as_str()) {
        errors.push(format!(
            "settings.metrics.path '{}' collides with a built-in route",
            metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}
