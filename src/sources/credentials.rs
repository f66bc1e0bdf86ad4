use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::constants::RESERVED_FORM_FIELDS;

/// Client credentials used against the IdP token endpoint.
///
/// Set once at construction and never mutated afterwards.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Additional form fields sent with every token request (`scope`, `audience`, ...).
    #[serde(default)]
    pub extra_params: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new(
        issuer_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            extra_params: BTreeMap::new(),
        }
    }

    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// Extra params whose key collides with a fixed grant field.
    pub fn reserved_extra_params(&self) -> Vec<&str> {
        self.extra_params
            .keys()
            .map(String::as_str)
            .filter(|key| RESERVED_FORM_FIELDS.contains(key))
            .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[censored]")
            .field("extra_params", &self.extra_params)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn debug_hides_client_secret() {
        let credentials = Credentials::new("https://idp.example.com/token", "cid", "secret");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("cid"));
        assert!(!printed.contains("secret\""));
        assert!(printed.contains("[censored]"));
    }

    #[test]
    fn reserved_extra_params_are_reported() {
        let credentials = Credentials::new("u", "cid", "secret")
            .with_extra_param("scope", "openid")
            .with_extra_param("client_id", "other");
        assert_eq!(credentials.reserved_extra_params(), vec!["client_id"]);
    }
}
