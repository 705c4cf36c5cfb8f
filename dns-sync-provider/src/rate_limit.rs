//! Rate limiter capability injected by the host.

use async_trait::async_trait;

/// Process-wide gate for outbound remote calls.
///
/// `accept` completes once the caller may issue one call. Implementations are
/// shared by every handler of the process.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn accept(&self);
}

/// A limiter that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedRateLimiter;

#[async_trait]
impl RateLimiter for UnlimitedRateLimiter {
    async fn accept(&self) {}
}
