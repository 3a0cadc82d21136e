// Transport seam between the typed API and the network.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Issues authenticated GET requests and returns the decoded JSON body.
///
/// [`HfsClient`](super::HfsClient) is the reqwest-backed implementation.
/// Implementations must be shareable across tasks: the exam-list aggregator
/// calls `get_json` from several spawned tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, token: &str) -> Result<Value>;
}
