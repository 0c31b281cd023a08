pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpPredictionApi;
pub use traits::PredictionApi;
pub use types::{ApiReply, ClientOptions};

/// Endpoint the form posts to, relative to the page origin
pub const PREDICT_ENDPOINT: &str = "/api/predict";
/// Backend liveness check
pub const HEALTH_ENDPOINT: &str = "/health";
