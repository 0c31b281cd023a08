use std::time::Duration;

/// Status and raw body of a completed API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client options for the prediction API
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Origin the form page is served from, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// No timeout when unset
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: None,
            user_agent: concat!("house-price-predictor/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
