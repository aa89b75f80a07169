//! JSON API client for the mail backend

use log::{debug, error};
use serde_json::Value;
use std::rc::Rc;

use super::Transport;

/// Path prefix shared by every backend endpoint
pub const API_PREFIX: &str = "/api/";

/// Failure of a single API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[error("API error: {status}")]
    RequestFailed { status: u16 },
    /// The body of a successful response was not valid JSON
    #[error("Invalid JSON in API response: {0}")]
    ParseFailed(#[source] serde_json::Error),
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),
}

/// Client for the JSON backend
///
/// Responses are returned verbatim as [`Value`]; no schema validation
/// happens here.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET `/api/{endpoint}` and parse the body as JSON
    ///
    /// `endpoint` must already contain any percent-encoded segments.
    pub async fn call(&self, endpoint: &str) -> Result<Value, ApiError> {
        debug!("API call: {}", endpoint);
        let response = self
            .transport
            .get(&format!("{}{}", API_PREFIX, endpoint))
            .await?;
        debug!("Response status for {}: {}", endpoint, response.status);

        if !response.is_success() {
            // Body goes to the log only, never into rendered markup
            error!("API error response for {}: {}", endpoint, response.body);
            return Err(ApiError::RequestFailed {
                status: response.status,
            });
        }

        let data: Value = serde_json::from_str(&response.body).map_err(ApiError::ParseFailed)?;
        debug!("API response for {}: {}", endpoint, data);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RawResponse, StaticTransport};
    use serde_json::json;

    fn client_with(transport: StaticTransport) -> ApiClient {
        ApiClient::new(Rc::new(transport))
    }

    #[test]
    fn test_success_returns_json_verbatim() {
        let mut transport = StaticTransport::new();
        transport.insert_json("query/tag%3Ainbox", json!([{"thread_id": "t1", "extra": true}]));
        let client = client_with(transport);

        let data = tokio_test::block_on(client.call("query/tag%3Ainbox")).unwrap();
        assert_eq!(data, json!([{"thread_id": "t1", "extra": true}]));
    }

    #[test]
    fn test_non_success_status_carries_code_not_body() {
        let mut transport = StaticTransport::new();
        transport.insert("thread/abc123", RawResponse::new(500, "stack trace <secret>"));
        let client = client_with(transport);

        let err = tokio_test::block_on(client.call("thread/abc123")).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 500 }));
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(!message.contains("secret"));
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let mut transport = StaticTransport::new();
        transport.insert("message/m1", RawResponse::new(200, "{not json"));
        let client = client_with(transport);

        let err = tokio_test::block_on(client.call("message/m1")).unwrap_err();
        assert!(matches!(err, ApiError::ParseFailed(_)));
    }

    #[test]
    fn test_unknown_endpoint_is_not_found() {
        let client = client_with(StaticTransport::new());
        let err = tokio_test::block_on(client.call("thread/missing")).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 404 }));
    }
}
