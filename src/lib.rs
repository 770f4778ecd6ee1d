//! # post-aggregator
//!
//! Concurrent aggregation of posts, their authors and their comments from an
//! HTTP API.
//!
//! One request fetches the post list. Every post then fans out into its own
//! task that fetches the post's author and comment list, and every comment fans
//! out again into an author lookup. The results are joined back into a list in
//! the order the API listed the posts in. Any failure aborts the whole run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use post_aggregator::{Aggregator, ApiClient, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::with_base_url("http://127.0.0.1:9999");
//!     let client = ApiClient::new(&config)?;
//!
//!     let report = Aggregator::new(Arc::new(client)).aggregate_timed().await?;
//!     for item in &report.posts {
//!         let author = &item.post.author.name;
//!         println!("{} by {}: {} comments", item.post.id, author, item.comments.len());
//!     }
//!     println!("{} ms", report.elapsed_ms());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Fan-out/fan-in orchestration
pub mod aggregator;
/// Data source trait
pub mod backend;
/// HTTP client for the posts API
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Core records
pub mod types;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use backend::Backend;
pub use client::{ApiClient, Endpoint};
pub use config::{Config, HttpConfig, HttpLogLevel};
pub use error::{Error, ErrorKind, Result};
pub use types::{
    AggregationReport, Author, AuthorId, Comment, CommentId, CommentRecord, Post, PostId,
    PostRecord, PostWithComments,
};

use std::sync::Arc;
use std::time::Duration;

/// Run one timed aggregation against the HTTP API described by `config`
///
/// # Example
///
/// ```no_run
/// use post_aggregator::{Config, aggregate_posts};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = aggregate_posts(&Config::default()).await?;
/// println!("{} posts in {} ms", report.posts.len(), report.elapsed_ms());
/// # Ok(())
/// # }
/// ```
pub async fn aggregate_posts(config: &Config) -> Result<AggregationReport> {
    let client = ApiClient::new(config)?;
    Aggregator::new(Arc::new(client)).aggregate_timed().await
}

/// Wait out the shutdown grace period, returning early on Ctrl+C (or SIGTERM on unix)
pub async fn wait_for_shutdown(grace: Duration) {
    tokio::select! {
        _ = tokio::time::sleep(grace) => {
            tracing::debug!(grace_ms = grace.as_millis() as u64, "grace period elapsed");
        }
        signal = termination_signal() => {
            tracing::info!(signal, "cutting the grace period short");
        }
    }
}

/// Resolves with the name of the first termination signal received
///
/// If no handler can be installed this never resolves and the grace period
/// runs its full length.
async fn termination_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            return tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                Ok(()) = tokio::signal::ctrl_c() => "SIGINT",
            };
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT",
        Err(e) => {
            tracing::warn!(error = %e, "no termination signal handler, waiting out the grace period");
            std::future::pending().await
        }
    }
}
