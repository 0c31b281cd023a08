use crate::api::PredictionApi;
use crate::error::SubmitError;
use crate::form::FormData;
use crate::models::{FeaturesInput, PredictionResult};
use crate::session::{SessionStore, RESULT_KEY};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Page the browser is sent to after a successful prediction
pub const RESULTS_PAGE: &str = "result.html";

/// Moves the user to another page
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, location: &str) -> Result<()>;
}

/// In-process stand-in for the browser location bar
#[derive(Debug, Default)]
pub struct LocationBar {
    current: RwLock<Option<String>>,
}

impl LocationBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<String> {
        self.current.read().await.clone()
    }
}

#[async_trait]
impl Navigator for LocationBar {
    async fn navigate(&self, location: &str) -> Result<()> {
        info!("Navigating to {}", location);
        *self.current.write().await = Some(location.to_string());
        Ok(())
    }
}

/// Drives one submit-to-result cycle per call.
///
/// Attempts are independent: there is no in-flight guard, so overlapping
/// calls each send their own request and the last success to finish owns
/// the stored result.
pub struct FormSubmissionController<A, S, N> {
    api: A,
    store: S,
    navigator: N,
    error_text: RwLock<String>,
}

impl<A, S, N> FormSubmissionController<A, S, N>
where
    A: PredictionApi,
    S: SessionStore,
    N: Navigator,
{
    pub fn new(api: A, store: S, navigator: N) -> Self {
        Self {
            api,
            store,
            navigator,
            error_text: RwLock::new(String::new()),
        }
    }

    /// Text currently shown in the form's error field
    pub async fn error_text(&self) -> String {
        self.error_text.read().await.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Handle a form submission. Returns the location navigated to.
    pub async fn handle_submit(&self, form: &FormData) -> Result<String, SubmitError> {
        // Coercion and validation finish before the first await
        let validated = form.coerce().validate();

        self.error_text.write().await.clear();

        let outcome = match validated {
            Ok(input) => self.submit(input).await,
            Err(err) => {
                if let SubmitError::Validation { fields } = &err {
                    debug!(?fields, "Rejected form with unparsable numeric fields");
                }
                Err(err)
            }
        };

        if let Err(err) = &outcome {
            *self.error_text.write().await = err.to_string();
        }
        outcome
    }

    async fn submit(&self, input: FeaturesInput) -> Result<String, SubmitError> {
        let reply = match self.api.predict(&input).await {
            Ok(reply) => reply,
            Err(err) => return Err(network_failure(err)),
        };

        if !reply.is_success() {
            let err = SubmitError::from_reply(reply.status, &reply.body);
            warn!(status = reply.status, "Prediction API rejected request: {}", err);
            return Err(err);
        }

        self.finish(input, &reply.body)
            .await
            .map_err(network_failure)
    }

    /// Store the result and move to the results page
    async fn finish(&self, input: FeaturesInput, body: &[u8]) -> Result<String> {
        let json: Value =
            serde_json::from_slice(body).context("Prediction response is not valid JSON")?;
        if json.is_null() {
            bail!("Prediction response body is null");
        }
        let result = PredictionResult::from_response(input, &json);

        let stored = serde_json::to_string(&result)?;
        self.store
            .set(RESULT_KEY, &stored)
            .await
            .context("Failed to store prediction result")?;

        info!(
            "✅ Stored {} prediction(s) from {}",
            result.predictions.len(),
            self.api.endpoint()
        );

        self.navigator.navigate(RESULTS_PAGE).await?;
        Ok(RESULTS_PAGE.to_string())
    }
}

fn network_failure(err: anyhow::Error) -> SubmitError {
    error!("Prediction request failed: {:#}", err);
    SubmitError::Network(err)
}
