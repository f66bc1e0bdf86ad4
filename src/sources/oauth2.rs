use std::time::Duration;

use http::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::settings::HttpClientConfig;
use crate::errors::RefreshError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sources::{Credentials, FetchToken, TokenResponse};
use crate::utils::constants::{
    ACCESS_TOKEN_FIELD, CLIENT_CREDENTIALS_GRANT, CLIENT_ID_FIELD, CLIENT_SECRET_FIELD,
    EXPIRES_IN_FIELD, GRANT_TYPE_FIELD, RESERVED_FORM_FIELDS,
};

/// OAuth2 Client Credentials Grant against the IdP token endpoint.
#[derive(Debug, Clone, Default)]
pub struct ClientCredentialsFetcher {
    client: Client,
}

impl ClientCredentialsFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(http: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http.timeout_ms))
            .build()?;
        Ok(Self::new(client))
    }

    async fn request(&self, credentials: &Credentials) -> Result<TokenResponse, RefreshError> {
        let url = credentials.issuer_url.as_str();
        let form = build_form(credentials);

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|source| RefreshError::Transport { url: url.to_owned(), source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RefreshError::Transport { url: url.to_owned(), source })?;

        if !status.is_success() {
            return Err(RefreshError::http_status(url, status, &body));
        }
        parse_token_response(url, &body)
    }
}

impl FetchToken for ClientCredentialsFetcher {
    async fn fetch(&self, credentials: &Credentials) -> Result<TokenResponse, RefreshError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.idp_fetch_requests.inc();
        info!(issuer = %credentials.issuer_url, "requesting new OIDC token");

        let result = self.request(credentials).await;
        metrics.idp_fetch_duration.observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(response) => {
                metrics.token_expires_in.set(response.expires_in);
                debug!(expires_in = response.expires_in, "token endpoint answered");
            }
            Err(err) => {
                metrics.idp_fetch_failures.with_label_values(&[err.kind().as_str()]).inc();
                debug!(issuer = %credentials.issuer_url, kind = err.kind().as_str(), error = %err, "token request failed");
            }
        }
        result
    }
}

/// Fixed grant fields first, then extra params in key order.
/// Extra params never override a fixed field.
pub fn build_form(credentials: &Credentials) -> Vec<(&str, &str)> {
    let mut form = vec![
        (GRANT_TYPE_FIELD, CLIENT_CREDENTIALS_GRANT),
        (CLIENT_ID_FIELD, credentials.client_id.as_str()),
        (CLIENT_SECRET_FIELD, credentials.client_secret.as_str()),
    ];

    for (key, value) in &credentials.extra_params {
        if RESERVED_FORM_FIELDS.contains(&key.as_str()) {
            warn!(param = %key, "extra param collides with a fixed grant field, skipped");
            continue;
        }
        form.push((key.as_str(), value.as_str()));
    }
    form
}

/// Extract `access_token` and `expires_in` from a token endpoint body.
///
/// `access_token` must be a JSON string and `expires_in` a JSON integer.
pub fn parse_token_response(url: &str, body: &str) -> Result<TokenResponse, RefreshError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| RefreshError::malformed(url, format!("didn't get a json response: {}", e)))?;

    let (Some(access_token), Some(expires_in)) =
        (json.get(ACCESS_TOKEN_FIELD), json.get(EXPIRES_IN_FIELD))
    else {
        return Err(RefreshError::malformed(
            url,
            format!("no {} or {} returned", ACCESS_TOKEN_FIELD, EXPIRES_IN_FIELD),
        ));
    };

    let access_token = access_token
        .as_str()
        .ok_or_else(|| RefreshError::malformed(url, format!("{} is not a string", ACCESS_TOKEN_FIELD)))?;
    let expires_in = expires_in
        .as_i64()
        .ok_or_else(|| RefreshError::malformed(url, format!("{} is not an integer", EXPIRES_IN_FIELD)))?;

    Ok(TokenResponse::new(access_token, expires_in))
}
