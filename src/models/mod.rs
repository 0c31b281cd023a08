use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature payload sent to the prediction API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeaturesInput {
    pub area: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub stories: i64,
    pub mainroad: bool,
    pub guestroom: bool,
    pub basement: bool,
    pub hotwaterheating: bool,
    pub airconditioning: bool,
    pub parking: i64,
    pub prefarea: bool,
    /// Sent as `null` when the form had no such field
    pub furnishingstatus: Option<String>,
}

/// Prediction stored in the session for the results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub input: FeaturesInput,
    pub predictions: Vec<Value>,
    pub model_version: Option<String>,
    pub accuracy: Option<f64>,
}

impl PredictionResult {
    /// Build the stored result from a successful response body.
    ///
    /// Extra response fields are ignored. `accuracy` falls back to `r2` only
    /// when the `accuracy` key is missing entirely; an explicit `null` is kept.
    pub fn from_response(input: FeaturesInput, body: &Value) -> Self {
        let predictions = match body.get("predictions") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let model_version = body
            .get("model_version")
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let accuracy = match (body.get("accuracy"), body.get("r2")) {
            (Some(acc), _) => acc.as_f64(),
            (None, Some(r2)) => r2.as_f64(),
            (None, None) => None,
        };

        Self {
            input,
            predictions,
            model_version,
            accuracy,
        }
    }
}

/// Backend liveness check (`GET /health`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}
