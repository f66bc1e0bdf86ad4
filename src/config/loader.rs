use std::{fs, path::Path};
use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::LoggingConfig;
use crate::config::types::ServiceConfig;
use crate::config::validator;
use crate::observability::metrics::get_metrics;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(&expanded).await
}

pub async fn parse_config(content: &str) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    if let Err(errors) = validator::validate_service_config(&service_config) {
        metrics.config_validation_errors.inc_by(errors.len() as u64);
        for e in &errors {
            error!("config validation: {}", e);
        }
        bail!("invalid config: {}", errors.join("; "));
    }

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}
