use governor::{Quota, RateLimiter, Jitter};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use std::num::NonZeroU32;
use std::sync::Arc;
use nonzero_ext::*;
use std::time::Duration;

/// Shared by every reasoning call in the process, across concurrent pipeline runs.
#[derive(Clone)]
pub struct ApiRateLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    burst_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ApiRateLimiter {
    pub fn new(per_minute: u32, burst_per_second: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(nonzero!(1u32));
        let burst = NonZeroU32::new(burst_per_second).unwrap_or(nonzero!(1u32));

        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
            burst_limiter: Arc::new(RateLimiter::direct(Quota::per_second(burst))),
        }
    }

    pub async fn acquire(&self) {
        self.burst_limiter.until_ready().await;
        self.limiter.until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100))).await;
    }
}

impl Default for ApiRateLimiter {
    fn default() -> Self {
        Self::new(50, 5)
    }
}
