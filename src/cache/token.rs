use std::time::Duration;
use tokio::time::Instant;

/// Token held by a supplier together with its absolute monotonic expiry.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: Instant,
}

impl CachedToken {
    pub fn new(value: String, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    /// Expired once `now` reaches `expires_at - margin`.
    pub fn is_expired(&self, now: Instant, margin: Duration) -> bool {
        self.expires_at
            .checked_sub(margin)
            .map_or(true, |refresh_at| now >= refresh_at)
    }
}

/// State of a single-slot token cache at one observation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing fetched yet.
    Empty,
    Valid(String),
    Expired,
}

impl TokenState {
    pub fn of(slot: Option<&CachedToken>, now: Instant, margin: Duration) -> Self {
        match slot {
            None => TokenState::Empty,
            Some(token) if token.is_expired(now, margin) => TokenState::Expired,
            Some(token) => TokenState::Valid(token.value.clone()),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            TokenState::Empty => "missing",
            TokenState::Valid(_) => "valid",
            TokenState::Expired => "expired",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn state_transitions_with_time() {
        let now = Instant::now();
        let token = CachedToken::new("tok".into(), now + Duration::from_secs(60));

        assert_eq!(TokenState::of(None, now, Duration::ZERO), TokenState::Empty);
        assert_eq!(
            TokenState::of(Some(&token), now, Duration::ZERO),
            TokenState::Valid("tok".into())
        );
        assert_eq!(
            TokenState::of(Some(&token), now + Duration::from_secs(59), Duration::ZERO),
            TokenState::Valid("tok".into())
        );
        assert_eq!(
            TokenState::of(Some(&token), now + Duration::from_secs(60), Duration::ZERO),
            TokenState::Expired
        );
    }

    #[tokio::test(start_paused = true)]
    async fn margin_moves_expiry_earlier() {
        let now = Instant::now();
        let token = CachedToken::new("tok".into(), now + Duration::from_secs(60));
        let margin = Duration::from_secs(10);

        assert!(!token.is_expired(now + Duration::from_secs(49), margin));
        assert!(token.is_expired(now + Duration::from_secs(50), margin));
    }

    #[tokio::test(start_paused = true)]
    async fn margin_beyond_clock_range_means_expired() {
        let now = Instant::now();
        let token = CachedToken::new("tok".into(), now + Duration::from_secs(60));

        assert!(token.is_expired(now, Duration::MAX));
    }
}
