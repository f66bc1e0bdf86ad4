// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;

use crate::errors::RefreshError;
use crate::sources::{Credentials, FetchToken, TokenResponse};

pub const ISSUER_URL: &str = "https://idp.example.com/token";
pub const CLIENT_ID: &str = "cid";
pub const CLIENT_SECRET: &str = "secret";

pub fn credentials() -> Credentials {
    Credentials::new(ISSUER_URL, CLIENT_ID, CLIENT_SECRET)
}

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Fetcher answering from a script, one entry per call.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<TokenResponse, RefreshError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn then_token(self, token: &str, expires_in: i64) -> Self {
        self.push(Ok(TokenResponse::new(token, expires_in)));
        self
    }

    pub fn then_error(self, error: RefreshError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, next: Result<TokenResponse, RefreshError>) {
        self.script.lock().unwrap().push_back(next);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FetchToken for ScriptedFetcher {
    async fn fetch(&self, credentials: &Credentials) -> Result<TokenResponse, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(RefreshError::malformed(&credentials.issuer_url, "script exhausted")))
    }
}

/// Shared handle so a test can keep scripting a fetcher owned by a supplier.
impl FetchToken for std::sync::Arc<ScriptedFetcher> {
    async fn fetch(&self, credentials: &Credentials) -> Result<TokenResponse, RefreshError> {
        self.as_ref().fetch(credentials).await
    }
}
