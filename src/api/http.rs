use crate::api::traits::PredictionApi;
use crate::api::types::{ApiReply, ClientOptions};
use crate::api::{HEALTH_ENDPOINT, PREDICT_ENDPOINT};
use crate::models::{FeaturesInput, HealthStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Prediction API reached over HTTP
pub struct HttpPredictionApi {
    client: Client,
    base_url: String,
}

impl HttpPredictionApi {
    /// Create a client for the API served at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(ClientOptions {
            base_url: base_url.into(),
            ..ClientOptions::default()
        })
    }

    /// Create a client with custom options
    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(options.user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe the backend and report whether a model is loaded
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.url(HEALTH_ENDPOINT);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach prediction API")?;

        if !response.status().is_success() {
            warn!("Health check returned status: {}", response.status());
            anyhow::bail!("Health check failed: {}", response.status());
        }

        let status = response
            .json::<HealthStatus>()
            .await
            .context("Failed to decode health response")?;

        info!(model_loaded = status.model_loaded, "Prediction API is {}", status.status);
        Ok(status)
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, input: &FeaturesInput) -> Result<ApiReply> {
        let url = self.url(PREDICT_ENDPOINT);
        debug!("Posting features to {}", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await
            .context("Failed to send prediction request")?;

        let status = response.status();
        let body = if status.is_success() {
            response
                .bytes()
                .await
                .context("Failed to read response body")?
                .to_vec()
        } else {
            // The error body is optional detail; losing it only costs the message
            match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(err) => {
                    debug!("Dropping unreadable error body: {}", err);
                    Vec::new()
                }
            }
        };

        debug!("Received {} bytes with status {}", body.len(), status);

        Ok(ApiReply {
            status: status.as_u16(),
            body,
        })
    }

    fn endpoint(&self) -> String {
        self.url(PREDICT_ENDPOINT)
    }
}
