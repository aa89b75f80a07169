//! Viewer configuration
//!
//! Loaded (in order of priority) from:
//! 1. Runtime environment variables
//! 2. JSON file (~/.config/mailview/mailview.json)
//! 3. Built-in defaults

use anyhow::{Context, Result, bail};
use ::config::{EnvLookup, Settings, Source};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::api::{StaticTransport, Transport, UreqTransport};
use crate::ordering::ResponseOrdering;

/// Config filename in the mailview config directory
pub const CONFIG_FILE: &str = "mailview.json";

/// Query used when the URL carries none
pub const DEFAULT_QUERY: &str = "tag:inbox";

pub const ENV_API_URL: &str = "MAILVIEW_API_URL";
pub const ENV_DEFAULT_QUERY: &str = "MAILVIEW_DEFAULT_QUERY";
pub const ENV_FIXTURES: &str = "MAILVIEW_FIXTURES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Origin of the backend; requests go to `{api_base_url}/api/...`
    pub api_base_url: String,
    pub default_query: String,
    /// strftime pattern for thread dates, rendered in local time
    pub date_format: String,
    pub response_ordering: ResponseOrdering,
    /// Per-request timeout; absent means wait indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Serve responses from a fixture file instead of the network
    pub fixtures: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            default_query: DEFAULT_QUERY.to_string(),
            date_format: "%b %d, %Y at %H:%M".to_string(),
            response_ordering: ResponseOrdering::default(),
            request_timeout_secs: None,
            fixtures: None,
        }
    }
}

impl Settings for ViewerConfig {
    const FILE: &'static str = CONFIG_FILE;

    fn apply_env(mut self, env: EnvLookup<'_>) -> Self {
        if let Some(url) = env(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(query) = env(ENV_DEFAULT_QUERY) {
            self.default_query = query;
        }
        if let Some(path) = env(ENV_FIXTURES) {
            self.fixtures = Some(PathBuf::from(path));
        }
        self
    }

    fn validate(&self) -> Result<()> {
        ViewerConfig::validate(self)
    }
}

impl ViewerConfig {
    /// Load the config file if present, then apply environment overrides
    pub fn load() -> Result<(Self, Source)> {
        ::config::load()
    }

    /// Load from a specific JSON file (no environment overrides)
    pub fn from_file(path: &Path) -> Result<Self> {
        ::config::load_file(path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse viewer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid api_base_url: {}", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_base_url must be http or https, got {}", url.scheme());
        }
        if self.default_query.is_empty() {
            bail!("default_query must not be empty");
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("Invalid date_format: {}", self.date_format);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build the transport this config describes
    pub fn transport(&self) -> Result<Rc<dyn Transport>> {
        match &self.fixtures {
            Some(path) => Ok(Rc::new(StaticTransport::from_file(path)?)),
            None => Ok(Rc::new(UreqTransport::new(
                self.api_base_url.clone(),
                self.request_timeout(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config =
            ViewerConfig::from_json(r#"{"response_ordering": "latest_request_wins"}"#).unwrap();
        assert_eq!(config.response_ordering, ResponseOrdering::LatestRequestWins);
        assert_eq!(config.default_query, "tag:inbox");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://mail.example.com"),
            (ENV_DEFAULT_QUERY, "tag:unread"),
        ]
        .into_iter()
        .collect();
        let config = ViewerConfig::default()
            .apply_env(&|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://mail.example.com");
        assert_eq!(config.default_query, "tag:unread");
        assert!(config.fixtures.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ViewerConfig::from_json(r#"{"api_base_url": "not a url"}"#).is_err());
        assert!(ViewerConfig::from_json(r#"{"api_base_url": "ftp://host"}"#).is_err());
        assert!(ViewerConfig::from_json(r#"{"default_query": ""}"#).is_err());
        assert!(ViewerConfig::from_json(r#"{"date_format": "%Q"}"#).is_err());
    }

    #[test]
    fn test_layered_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"default_query": "tag:work", "request_timeout_secs": 5}"#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = [(ENV_FIXTURES, "/tmp/fixtures.json")].into_iter().collect();

        let (config, source) = ::config::load_in::<ViewerConfig>(dir.path(), &|key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(source, Source::File(dir.path().join(CONFIG_FILE)));
        assert_eq!(config.default_query, "tag:work");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.fixtures, Some(PathBuf::from("/tmp/fixtures.json")));
    }

    #[test]
    fn test_env_cannot_bypass_validation() {
        let dir = tempfile::tempdir().unwrap();
        let result = ::config::load_in::<ViewerConfig>(dir.path(), &|key| {
            (key == ENV_API_URL).then(|| "ftp://host".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"request_timeout_secs": 30}"#).unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_fixture_transport() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        std::fs::write(&path, r#"{"query/tag%3Ainbox": []}"#).unwrap();
        let config = ViewerConfig {
            fixtures: Some(path),
            ..Default::default()
        };

        let transport = config.transport().unwrap();
        let response = tokio_test::block_on(transport.get("/api/query/tag%3Ainbox")).unwrap();
        assert_eq!(response.body, "[]");
    }
}
