//! Error types for post-aggregator
//!
//! Every fetch site reports one of the variants below. The aggregation does not
//! recover locally: the first error anywhere in the fetch graph becomes the
//! error of the whole run.

use crate::types::AuthorId;
use thiserror::Error;

/// Result type alias for post-aggregator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for post-aggregator
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (connection refused, timeout, I/O failure)
    #[error("transport error for {url}: {source}")]
    Transport {
        /// URL of the failed request
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("request to {url} failed with status {status}: {message}")]
    RequestFailed {
        /// URL of the failed request
        url: String,
        /// HTTP status code returned by the server
        status: u16,
        /// Server-provided reason phrase
        message: String,
    },

    /// The server answered with a success status but no body
    #[error("response body from {url} is empty")]
    EmptyBody {
        /// URL of the request
        url: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// URL of the request
        url: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// An author lookup returned a record for a different author
    #[error("requested author {requested} but the server returned author {received}")]
    AuthorMismatch {
        /// The author id that was asked for
        requested: AuthorId,
        /// The author id found in the response
        received: AuthorId,
    },

    /// A spawned aggregation task panicked or was cancelled
    #[error("aggregation task failed: {0}")]
    Task(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },
}

/// Coarse classification of [`Error`] used for structured logging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received
    Transport,
    /// Non-success HTTP status
    RequestFailed,
    /// Success status without a body
    EmptyBody,
    /// Malformed or mismatching payload
    Decode,
    /// Task failure inside the aggregator
    Internal,
    /// Invalid configuration
    Config,
}

impl ErrorKind {
    /// Stable snake_case name, suitable for log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::RequestFailed => "request_failed",
            ErrorKind::EmptyBody => "empty_body",
            ErrorKind::Decode => "decode",
            ErrorKind::Internal => "internal",
            ErrorKind::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::RequestFailed { .. } => ErrorKind::RequestFailed,
            Error::EmptyBody { .. } => ErrorKind::EmptyBody,
            // a mismatching author is a payload that does not fit the request
            Error::Decode { .. } | Error::AuthorMismatch { .. } => ErrorKind::Decode,
            Error::Task(_) => ErrorKind::Internal,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// URL of the request that failed, if the error came from a fetch
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. }
            | Error::RequestFailed { url, .. }
            | Error::EmptyBody { url }
            | Error::Decode { url, .. } => Some(url),
            Error::AuthorMismatch { .. } | Error::Task(_) | Error::Config { .. } => None,
        }
    }

    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Error::Task("task was cancelled".to_string())
        } else {
            Error::Task(format!("task panicked: {}", err))
        }
    }
}
