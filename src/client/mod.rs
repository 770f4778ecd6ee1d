//! HTTP access to the posts API
//!
//! [`ApiClient`] performs one typed GET per call: it sends the request, maps
//! transport failures and non-success statuses onto [`Error`], and decodes the
//! JSON body into the requested type. There are no retries and nothing is cached.
//!
//! - [`endpoints`] - API paths and URL construction
//! - `http_log` - request/response logging at the configured verbosity

pub mod endpoints;
mod http_log;


pub use endpoints::Endpoint;

use crate::backend::Backend;
use crate::config::{Config, HttpLogLevel};
use crate::error::{Error, Result};
use crate::types::{Author, AuthorId, CommentRecord, PostId, PostRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Instant;
use url::Url;

/// Typed client for the posts API (cloneable - the underlying connection pool is shared)
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    log_level: HttpLogLevel,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// Validates the configuration and builds a `reqwest` client with the
    /// configured connect timeout, optional request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.validate()?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.http.connect_timeout)
            .user_agent(config.http.user_agent.clone());
        if let Some(timeout) = config.http.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e), "http"))?;

        Ok(Self {
            http,
            base_url,
            log_level: config.http.log_level,
        })
    }

    /// The validated base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of `endpoint` for this client
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url> {
        endpoint.url(&self.base_url)
    }

    /// GET `url` and decode the JSON body into `T`
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if no response arrives or the body cannot be read
    /// - [`Error::RequestFailed`] for a non-2xx status, carrying the reason phrase
    /// - [`Error::EmptyBody`] for a 2xx response without a body
    /// - [`Error::Decode`] if the body is not valid JSON of the expected shape
    pub async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        http_log::log_request(self.log_level, &url);
        let started = Instant::now();

        let response = match self.http.get(url.clone()).send().await {
            Ok(response) => response,
            Err(source) => {
                http_log::log_failure(self.log_level, &url, started.elapsed(), &source);
                return Err(Error::Transport {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = reason_phrase(&response);
            // The body is only read for the log; the error carries the reason phrase
            let body = response.bytes().await.unwrap_or_default();
            http_log::log_response(self.log_level, &url, status, started.elapsed(), &body);
            return Err(Error::RequestFailed {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => {
                http_log::log_failure(self.log_level, &url, started.elapsed(), &source);
                return Err(Error::Transport {
                    url: url.to_string(),
                    source,
                });
            }
        };
        http_log::log_response(self.log_level, &url, status, started.elapsed(), &body);

        if body.is_empty() {
            return Err(Error::EmptyBody {
                url: url.to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_endpoint<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = self.url_for(endpoint)?;
        self.fetch(url).await
    }
}

/// Reason phrase of the status line as the server sent it
///
/// hyper only records the phrase when it differs from the canonical one, so a
/// missing or blank phrase falls back to the canonical reason of the status.
fn reason_phrase(response: &reqwest::Response) -> String {
    let sent = response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).trim().to_string())
        .filter(|reason| !reason.is_empty());

    sent.unwrap_or_else(|| {
        response
            .status()
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    })
}

#[async_trait]
impl Backend for ApiClient {
    async fn get_posts(&self) -> Result<Vec<PostRecord>> {
        self.fetch_endpoint(Endpoint::Posts).await
    }

    async fn get_comments(&self, post_id: PostId) -> Result<Vec<CommentRecord>> {
        self.fetch_endpoint(Endpoint::PostComments(post_id)).await
    }

    async fn get_author(&self, author_id: AuthorId) -> Result<Author> {
        self.fetch_endpoint(Endpoint::Author(author_id)).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
