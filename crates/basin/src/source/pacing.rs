//! Fixed inter-request pacing for upstream hosts.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Paces requests to one upstream host.
///
/// Built on a direct governor limiter whose quota period equals the
/// configured delay, so no two requests through the same pacer are issued
/// closer together than the delay. Waiting is a non-blocking suspension; no
/// lock is held and no worker thread is consumed.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use basin::source::HostPacer;
///
/// let pacer = HostPacer::new(Duration::from_millis(250));
///
/// // Before each request to the host:
/// pacer.wait().await;
/// ```
#[derive(Clone)]
pub struct HostPacer {
    inner: Arc<GovernorRateLimiter>,
}

impl HostPacer {
    /// Create a pacer with the given minimum delay between requests.
    ///
    /// A zero delay disables pacing in all but name (one request per
    /// nanosecond).
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let period = if delay.is_zero() {
            Duration::from_nanos(1)
        } else {
            delay
        };
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::new(1).expect("1 is non-zero")));

        Self {
            inner: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wait until the next request is allowed.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}
