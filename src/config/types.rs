use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::sources::Credentials;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub supplier: SupplierConfig,
    pub credentials: Credentials,
}

/// ================================
/// Supplier
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierConfig {
    /// `false` requests a new token from the IdP on every call.
    #[serde(default = "default_caching")]
    pub caching: bool,
    /// Refresh this many seconds before the token actually expires.
    #[serde(default)]
    pub refresh_margin_seconds: u64,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self { caching: default_caching(), refresh_margin_seconds: 0 }
    }
}

fn default_caching() -> bool {
    true
}
