//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_TOKEN_PATH: &str = "/token";
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Upper bound applied to `expires_in` before it is added to an instant.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

// OAuth2 Client Credentials Grant form fields
pub const GRANT_TYPE_FIELD: &str = "grant_type";
pub const CLIENT_ID_FIELD: &str = "client_id";
pub const CLIENT_SECRET_FIELD: &str = "client_secret";
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Form fields `extra_params` may not override.
pub const RESERVED_FORM_FIELDS: [&str; 3] = [GRANT_TYPE_FIELD, CLIENT_ID_FIELD, CLIENT_SECRET_FIELD];

// Token response fields
pub const ACCESS_TOKEN_FIELD: &str = "access_token";
pub const EXPIRES_IN_FIELD: &str = "expires_in";
