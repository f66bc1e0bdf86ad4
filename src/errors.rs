use http::StatusCode;
use thiserror::Error;

/// Longest slice of an IdP error body kept in [`RefreshError::HttpStatus`].
pub const MAX_ERROR_BODY_CHARS: usize = 256;

/// Failure to obtain a subject token from the IdP.
///
/// Every way a refresh can fail surfaces as this one type so callers can
/// apply a single retry policy. [`RefreshError::kind`] tells the variants
/// apart when a label is needed (metrics, logs).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RefreshError {
    /// The IdP could not be reached (connection refused, timeout, TLS).
    #[error("failed to reach token endpoint {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The IdP answered with a non-success status.
    #[error("token endpoint {url} responded with {status}: {body}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The body is not JSON, lacks a required field, or a field has the wrong type.
    #[error("malformed token response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    HttpStatus,
    MalformedResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            FailureKind::Transport => "transport",
            FailureKind::HttpStatus => "http_status",
            FailureKind::MalformedResponse => "malformed_response",
        }
    }
}

impl RefreshError {
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        RefreshError::MalformedResponse {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn http_status(url: &str, status: StatusCode, body: &str) -> Self {
        RefreshError::HttpStatus {
            url: url.to_owned(),
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            RefreshError::Transport { .. } => FailureKind::Transport,
            RefreshError::HttpStatus { .. } => FailureKind::HttpStatus,
            RefreshError::MalformedResponse { .. } => FailureKind::MalformedResponse,
        }
    }

    /// Returns `true` when the same request may succeed later.
    ///
    /// Transport failures, `408`, `429` and any `5xx` are retryable. A
    /// malformed body or another client error is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RefreshError::Transport { .. } => true,
            RefreshError::HttpStatus { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::REQUEST_TIMEOUT
            }
            RefreshError::MalformedResponse { .. } => false,
        }
    }
}
