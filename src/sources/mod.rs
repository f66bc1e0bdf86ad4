/// Sources module
///
/// Token sources the suppliers draw from. Every source performs exactly one
/// round trip per call: no retry, no caching, no expiry bookkeeping.

use crate::errors::RefreshError;

pub mod credentials;
pub mod oauth2;

pub use credentials::Credentials;
pub use oauth2::ClientCredentialsFetcher;

/// Token as returned by the IdP for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds from now until the token expires. May be zero or negative.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self { access_token: access_token.into(), expires_in }
    }
}

pub trait FetchToken {
    fn fetch(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<TokenResponse, RefreshError>> + Send;
}
