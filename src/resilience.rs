//! Rate limiting and request timeouts.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;

/// Request budget when timeouts are enabled.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One token bucket shared by every client of the chat service.
///
/// The bucket starts full at `burst_size` tokens and refills continuously at
/// `rate_per_sec`; each accepted request spends one token.
#[derive(Debug)]
pub struct SimpleRateLimiter {
    bucket: Mutex<Bucket>,
    rate_per_sec: f32,
    burst_size: f32,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    refilled_at: Instant,
    tokens: f32,
}

impl SimpleRateLimiter {
    pub fn new(rate_per_sec: f32, burst_size: f32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                refilled_at: Instant::now(),
                tokens: burst_size,
            }),
            rate_per_sec,
            burst_size,
        }
    }

    /// Spend a token for one request; `false` when the bucket is empty.
    pub fn check(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let refill = now.duration_since(bucket.refilled_at).as_secs_f32() * self.rate_per_sec;

        bucket.refilled_at = now;
        bucket.tokens = (bucket.tokens + refill).min(self.burst_size);

        if bucket.tokens < 1.0 {
            return false;
        }
        bucket.tokens -= 1.0;
        true
    }
}

/// Answer `429` once the shared bucket is empty, when limiting is enabled.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if state.config.resilience.rate_limit_enabled && !state.rate_limiter.check() {
        tracing::warn!(name: "http.rate_limited", path = %req.uri().path(), "Request rate limited");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }
    Ok(next.run(req).await)
}

/// Answer `408` when a handler runs past `REQUEST_TIMEOUT`.
///
/// Disabling the timeout keeps the layer and stretches the budget to a year so
/// the router type stays the same either way.
pub async fn timeout_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let budget = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        REQUEST_TIMEOUT
    };

    match tokio::time::timeout(budget, next.run(req)).await {
        Ok(res) => res,
        Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rate_limiter() {
        let limiter = SimpleRateLimiter::new(2.0, 3.0); // 2 req/s, 3 burst

        assert!(limiter.check());
        assert!(limiter.check());
        assert!(limiter.check());

        // burst exhausted
        assert!(!limiter.check());

        // 0.6s -> +1.2 tokens
        std::thread::sleep(Duration::from_millis(600));
        assert!(limiter.check());
        assert!(!limiter.check());
    }

    #[test]
    fn test_idle_bucket_refills_only_to_burst() {
        let limiter = SimpleRateLimiter::new(10.0, 2.0);
        std::thread::sleep(Duration::from_millis(400));

        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());
    }
}
