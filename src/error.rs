use serde_json::Value;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str =
    "Please provide valid numeric values for area, bedrooms, bathrooms, stories, and parking.";
pub const NETWORK_MESSAGE: &str = "Network error: could not reach prediction API";

/// Failure of one submit attempt. `Display` is the text shown in the error field.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation { fields: Vec<&'static str> },
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{}", NETWORK_MESSAGE)]
    Network(#[source] anyhow::Error),
}

impl SubmitError {
    /// Build an API error from a non-success reply body, tolerating bodies
    /// that are empty or not JSON.
    pub fn from_reply(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|json| error_detail(&json))
            .unwrap_or_else(|| format!("API error: {status}"));

        Self::Api { status, message }
    }
}

fn error_detail(body: &Value) -> Option<String> {
    let from_error = match body.get("error") {
        Some(Value::Object(inner)) => inner.get("message").and_then(non_empty_text),
        Some(other) => non_empty_text(other),
        None => None,
    };

    from_error.or_else(|| body.get("message").and_then(non_empty_text))
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_field() {
        let err = SubmitError::from_reply(400, br#"{"error":"bad input","message":"ignored"}"#);
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn falls_back_to_message_field() {
        let err = SubmitError::from_reply(422, br#"{"error":"","message":"try again"}"#);
        assert_eq!(err.to_string(), "try again");
    }

    #[test]
    fn reads_nested_auth_error() {
        let err = SubmitError::from_reply(401, br#"{"error":{"message":"Token Expired"}}"#);
        assert_eq!(err.to_string(), "Token Expired");
    }

    #[test]
    fn unparsable_body_reports_status() {
        let err = SubmitError::from_reply(500, b"<html>Internal Server Error</html>");
        assert_eq!(err.to_string(), "API error: 500");

        let err = SubmitError::from_reply(503, b"");
        assert_eq!(err.to_string(), "API error: 503");
    }

    #[test]
    fn fixed_messages() {
        let err = SubmitError::Validation { fields: vec!["area"] };
        assert_eq!(err.to_string(), VALIDATION_MESSAGE);

        let err = SubmitError::Network(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), NETWORK_MESSAGE);
    }
}
