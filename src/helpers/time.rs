use std::time::Duration;
use tokio::time::Instant;

use crate::utils::constants::MAX_TOKEN_LIFETIME_SECS;

/// Monotonic now. Backed by tokio so tests can pause and advance it.
pub fn get_instant() -> Instant {
    Instant::now()
}

/// Absolute expiry for a token received at `fetched_at`.
///
/// Zero or negative `expires_in` yields `fetched_at` itself, i.e. already expired.
pub fn expires_at(fetched_at: Instant, expires_in: i64) -> Instant {
    let secs = expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS) as u64;
    fetched_at + Duration::from_secs(secs)
}
