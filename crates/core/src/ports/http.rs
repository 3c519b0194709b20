//! HTTP abstraction for fetching the status page and the provider summary.

use crate::domain::model::{FetchError, GetResult};

#[async_trait::async_trait]
pub trait Http: Send + Sync {
    /// Never fails; transport problems are reported inside the result.
    async fn get(&self, url: &str) -> GetResult;

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}
