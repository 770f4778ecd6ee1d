//! Configuration types for post-aggregator

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Verbosity of the HTTP request/response log
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpLogLevel {
    /// Nothing is logged
    None,
    /// Request line, response status and timing
    Basic,
    /// Everything in `Basic` plus the response body
    #[default]
    Body,
}

/// HTTP transport settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for establishing a connection (default: 30 seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Timeout for a whole request (None = only the connect timeout applies)
    #[serde(default)]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request/response logging verbosity (default: body)
    #[serde(default)]
    pub log_level: HttpLogLevel,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: None,
            user_agent: default_user_agent(),
            log_level: HttpLogLevel::default(),
        }
    }
}

/// Main configuration for an aggregation run
///
/// There are no CLI flags or environment lookups; the binary runs with
/// [`Config::default`] and embedders build their own value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the API, e.g. `http://127.0.0.1:9999` (a path prefix is kept)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// How long the binary waits after reporting before it exits (default: 30 seconds)
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace: Duration,

    /// `tracing-subscriber` filter directive used by the binary (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http: HttpConfig::default(),
            shutdown_grace: default_shutdown_grace(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Create a default configuration pointing at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Parse and check the base URL
    ///
    /// The URL must use `http` or `https` and must be able to carry a path.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| {
            Error::config(
                format!("invalid base URL '{}': {}", self.base_url, e),
                "base_url",
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                format!("unsupported scheme '{}' in base URL", url.scheme()),
                "base_url",
            ));
        }
        if url.cannot_be_a_base() {
            return Err(Error::config(
                format!("base URL '{}' cannot carry a path", self.base_url),
                "base_url",
            ));
        }

        Ok(url)
    }

    /// Validate the configuration, returning the parsed base URL
    pub fn validate(&self) -> Result<Url> {
        let base_url = self.parsed_base_url()?;

        if self.http.connect_timeout.is_zero() {
            return Err(Error::config(
                "connect timeout must be greater than zero",
                "http.connect_timeout",
            ));
        }
        if self.http.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config(
                "request timeout must be greater than zero when set",
                "http.request_timeout",
            ));
        }

        Ok(base_url)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:9999".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("post-aggregator/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(30)
}

fn default_log_filter() -> String {
    "info".to_string()
}
