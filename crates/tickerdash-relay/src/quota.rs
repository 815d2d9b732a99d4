use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Process-wide budget for proxied calls.
#[derive(Clone)]
pub struct RelayQuota {
    limiter: Arc<DirectRateLimiter>,
    per_minute: u32,
}

impl RelayQuota {
    pub fn per_minute(limit: u32) -> Self {
        let quota = quota_from_window(Duration::from_secs(60), limit);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            per_minute: limit.max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.per_minute
    }

    /// Consumes one unit of budget; `false` when exhausted.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

fn quota_from_window(window: Duration, limit: u32) -> Quota {
    let safe_limit = limit.max(1);
    let burst = NonZeroU32::new(safe_limit).unwrap_or(NonZeroU32::MIN);

    let seconds_per_cell = (window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    Quota::with_period(Duration::from_secs_f64(seconds_per_cell))
        .unwrap_or_else(|| Quota::per_minute(burst))
        .allow_burst(burst)
}
