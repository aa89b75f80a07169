//! HTTP transports behind the API client
//!
//! [`UreqTransport`] talks to a live backend. [`StaticTransport`] serves
//! canned responses for offline use and tests.

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use super::{API_PREFIX, ApiError};

/// Boxed future that is not required to be `Send`
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Status and body of an HTTP response, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests for absolute paths such as `/api/thread/t1`
///
/// Non-2xx statuses are returned as responses; only failures to obtain a
/// response at all are errors.
pub trait Transport {
    fn get(&self, path: &str) -> LocalBoxFuture<'static, Result<RawResponse, ApiError>>;
}

/// Transport backed by a `ureq` agent
///
/// ureq is synchronous; each request runs on tokio's blocking pool so the
/// event loop keeps interleaving other loads.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    /// Create a transport for the backend at `base_url`
    ///
    /// `timeout` of `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for UreqTransport {
    fn get(&self, path: &str) -> LocalBoxFuture<'static, Result<RawResponse, ApiError>> {
        let agent = self.agent.clone();
        let url = format!("{}{}", self.base_url, path);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || fetch_blocking(&agent, &url))
                .await
                .map_err(|e| ApiError::Transport(format!("request task failed: {}", e)))?
        })
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str) -> Result<RawResponse, ApiError> {
    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status().as_u16();

    let body = match response.body_mut().read_to_string() {
        Ok(body) => body,
        // Error bodies are diagnostics only
        Err(e) if !(200..300).contains(&status) => {
            debug!("Could not read error body from {}: {}", url, e);
            String::new()
        }
        Err(e) => return Err(ApiError::Transport(e.to_string())),
    };

    Ok(RawResponse { status, body })
}

/// One entry of a fixture file
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Response { status: u16, body: Value },
    Json(Value),
}

/// Transport answering from an in-memory endpoint table
///
/// Keys are endpoints without the `/api/` prefix, e.g. `query/tag%3Ainbox`.
/// Unknown endpoints answer 404.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    responses: HashMap<String, RawResponse>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw response for an endpoint
    pub fn insert(&mut self, endpoint: impl Into<String>, response: RawResponse) {
        self.responses.insert(endpoint.into(), response);
    }

    /// Register a 200 response carrying `value` as its JSON body
    pub fn insert_json(&mut self, endpoint: impl Into<String>, value: Value) {
        self.insert(endpoint, RawResponse::new(200, value.to_string()));
    }

    /// Build a transport from a JSON object of `endpoint -> response`
    ///
    /// A value shaped `{"status": 500, "body": ...}` sets the status; any
    /// other value is served as a 200 JSON body.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(json)?;
        let mut transport = Self::new();
        for (endpoint, entry) in entries {
            let response = match entry {
                FixtureEntry::Response { status, body } => {
                    let body = match body {
                        Value::String(text) => text,
                        other => other.to_string(),
                    };
                    RawResponse::new(status, body)
                }
                FixtureEntry::Json(value) => RawResponse::new(200, value.to_string()),
            };
            transport.insert(endpoint, response);
        }
        Ok(transport)
    }

    /// Load a fixture file (see [`StaticTransport::from_json`])
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse fixtures: {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Transport for StaticTransport {
    fn get(&self, path: &str) -> LocalBoxFuture<'static, Result<RawResponse, ApiError>> {
        let endpoint = path.strip_prefix(API_PREFIX).unwrap_or(path);
        let response = self
            .responses
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| RawResponse::new(404, format!("no fixture for {}", endpoint)));
        Box::pin(async move { Ok(response) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_entries() {
        let json = r#"{
            "query/tag%3Ainbox": [],
            "thread/abc123": {"status": 500, "body": "boom"},
            "message/m1": {"content_type": "text/plain", "content": "hi", "attachments": []}
        }"#;
        let transport = StaticTransport::from_json(json).unwrap();
        assert_eq!(transport.len(), 3);

        let inbox = tokio_test::block_on(transport.get("/api/query/tag%3Ainbox")).unwrap();
        assert_eq!(inbox, RawResponse::new(200, "[]"));

        let failing = tokio_test::block_on(transport.get("/api/thread/abc123")).unwrap();
        assert_eq!(failing, RawResponse::new(500, "boom"));

        let message = tokio_test::block_on(transport.get("/api/message/m1")).unwrap();
        assert!(message.is_success());
        assert!(message.body.contains("text/plain"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let transport = UreqTransport::new("http://localhost:8080/", None);
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }
}
