//! Fan-out/fan-in assembly of posts, authors and comments
//!
//! The fetch graph has three levels:
//!
//! 1. the post list (one request, awaited before anything else starts);
//! 2. one spawned task per post, fetching the post's author and its comment
//!    list concurrently;
//! 3. inside each post task, one concurrent author lookup per comment.
//!
//! Results are joined back in source order. The first error anywhere fails the
//! whole aggregation: the remaining post tasks are aborted and the sibling
//! comment lookups of the failing post are dropped, so no partial result ever
//! escapes.

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{AggregationReport, Author, AuthorId, PostRecord, PostWithComments};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrates one aggregation over a [`Backend`] (cloneable - the backend is Arc-wrapped)
pub struct Aggregator<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: ?Sized> Clone for Aggregator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend + ?Sized + 'static> Aggregator<B> {
    /// Create an aggregator reading from `backend`
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// The backend this aggregator reads from
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Fetch every post with its author and its author-annotated comments
    ///
    /// The returned list has the same length and order as the post list the
    /// backend returned. An empty post list returns immediately without any
    /// author or comment lookups.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any lookup. Outstanding work is
    /// cancelled and nothing is returned for the posts that did succeed.
    pub async fn aggregate(&self) -> Result<Vec<PostWithComments>> {
        let posts = self.backend.get_posts().await?;
        info!(
            backend = self.backend.name(),
            posts = posts.len(),
            "post list received"
        );

        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let total = posts.len();
        let mut tasks = JoinSet::new();
        for (index, post) in posts.into_iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            tasks.spawn(async move {
                let result = assemble_post(backend.as_ref(), post).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<PostWithComments>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(Error::from)
                .and_then(|(index, result)| result.map(|assembled| (index, assembled)));

            match outcome {
                Ok((index, assembled)) => slots[index] = Some(assembled),
                Err(e) => {
                    tasks.abort_all();
                    warn!(
                        error = %e,
                        kind = %e.kind(),
                        cancelled = tasks.len(),
                        "aggregation aborted"
                    );
                    return Err(e);
                }
            }
        }

        // Each spawned task fills exactly one slot before the set drains
        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Task("a post task finished without a result".to_string()))
    }

    /// Run [`aggregate`](Self::aggregate) and measure its wall-clock time
    pub async fn aggregate_timed(&self) -> Result<AggregationReport> {
        let started = Instant::now();
        let posts = self.aggregate().await?;
        let report = AggregationReport {
            posts,
            elapsed: started.elapsed(),
        };

        info!(
            posts = report.posts.len(),
            comments = report.comment_count(),
            elapsed_ms = report.elapsed_ms() as u64,
            "aggregation complete"
        );
        Ok(report)
    }
}

/// Build one [`PostWithComments`]: author and comment list in parallel, then
/// every comment author in parallel.
async fn assemble_post<B: Backend + ?Sized>(
    backend: &B,
    post: PostRecord,
) -> Result<PostWithComments> {
    let post_id = post.id;
    let (author, comments) = tokio::try_join!(
        fetch_author(backend, post.author_id),
        backend.get_comments(post_id)
    )?;

    let comments = try_join_all(comments.into_iter().map(|comment| async move {
        let author = fetch_author(backend, comment.author_id).await?;
        Ok::<_, Error>(comment.with_author(author))
    }))
    .await?;

    debug!(post_id = %post_id, comments = comments.len(), "post assembled");
    Ok(PostWithComments {
        post: post.with_author(author),
        comments,
    })
}

async fn fetch_author<B: Backend + ?Sized>(backend: &B, author_id: AuthorId) -> Result<Author> {
    let author = backend.get_author(author_id).await?;
    if author.id != author_id {
        return Err(Error::AuthorMismatch {
            requested: author_id,
            received: author.id,
        });
    }
    Ok(author)
}
