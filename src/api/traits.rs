use crate::api::types::ApiReply;
use crate::models::FeaturesInput;
use anyhow::Result;
use async_trait::async_trait;

/// Transport used by the form controller to reach the prediction service.
/// An `Err` means the request never completed (connectivity, TLS, aborted body);
/// any HTTP status, including failures, comes back as `Ok`.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// POST the payload as JSON and return the status and fully read body
    async fn predict(&self, input: &FeaturesInput) -> Result<ApiReply>;

    /// Human-readable target, for logs
    fn endpoint(&self) -> String;
}
