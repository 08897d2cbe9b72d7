use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota};

use super::client::RateLimitConfig;

/// Client-side token bucket, one per exchange client.
///
/// Refills at `requests_per_second` and holds up to `burst_size` tokens.
/// Zero values fall back to one request per second.
pub struct RateLimiter {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: NonZeroU32,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let requests_per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(requests_per_second);
        let quota = Quota::per_second(requests_per_second).allow_burst(burst);

        Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
            requests_per_second,
        }
    }

    /// Wait for a token. Requests are delayed, never rejected.
    pub async fn acquire(&self) {
        if self.limiter.check().is_ok() {
            return;
        }
        log::debug!("Rate limit of {}/s reached, waiting", self.requests_per_second);
        self.limiter.until_ready().await;
    }

    /// Take a token if one is available right now
    #[cfg(test)]
    fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
