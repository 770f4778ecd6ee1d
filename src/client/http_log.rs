//! Request/response logging for [`ApiClient`](super::ApiClient)

use crate::config::HttpLogLevel;
use reqwest::StatusCode;
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

pub(crate) fn log_request(level: HttpLogLevel, url: &Url) {
    if level == HttpLogLevel::None {
        return;
    }
    tracing::info!(url = %url, "--> GET");
}

pub(crate) fn log_response(
    level: HttpLogLevel,
    url: &Url,
    status: StatusCode,
    elapsed: Duration,
    body: &[u8],
) {
    match level {
        HttpLogLevel::None => {}
        HttpLogLevel::Basic => {
            tracing::info!(
                url = %url,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis() as u64,
                bytes = body.len(),
                "<-- response"
            );
        }
        HttpLogLevel::Body => {
            tracing::info!(
                url = %url,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis() as u64,
                bytes = body.len(),
                body = %body_text(body),
                "<-- response"
            );
        }
    }
}

pub(crate) fn log_failure(
    level: HttpLogLevel,
    url: &Url,
    elapsed: Duration,
    error: &reqwest::Error,
) {
    if level == HttpLogLevel::None {
        return;
    }
    tracing::warn!(
        url = %url,
        elapsed_ms = elapsed.as_millis() as u64,
        timeout = error.is_timeout(),
        connect = error.is_connect(),
        error = %error,
        "<-- HTTP FAILED"
    );
}

/// Render a response body for the log
fn body_text(body: &[u8]) -> Cow<'_, str> {
    if body.is_empty() {
        Cow::Borrowed("(empty body)")
    } else {
        String::from_utf8_lossy(body)
    }
}
