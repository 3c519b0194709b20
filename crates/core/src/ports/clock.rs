//! Time source for polling timestamps and API-key expiry.

/// Milliseconds since the Unix epoch.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    async fn now_epoch_ms(&self) -> i64;
}
