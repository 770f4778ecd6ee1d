//! The data source the aggregator reads from

use crate::types::{Author, AuthorId, CommentRecord, PostId, PostRecord};
use async_trait::async_trait;

/// Trait for the three typed lookups the aggregation needs
///
/// [`ApiClient`](crate::client::ApiClient) implements this over HTTP. Any other
/// implementation (an in-memory fixture, a recorded dataset) can be plugged into
/// [`Aggregator`](crate::aggregator::Aggregator) the same way.
///
/// Implementations are shared across spawned tasks, so they must be
/// `Send + Sync + 'static` when handed to the aggregator.
///
/// # Examples
///
/// ```no_run
/// use post_aggregator::{ApiClient, Backend, Config};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(&Config::default())?;
/// for post in client.get_posts().await? {
///     let author = client.get_author(post.author_id).await?;
///     println!("{} by {}", post.id, author.name);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full list of posts
    ///
    /// # Errors
    ///
    /// Returns any [`Error`](crate::Error) raised while fetching or decoding.
    async fn get_posts(&self) -> crate::Result<Vec<PostRecord>>;

    /// Fetch the comments of one post, in server order
    async fn get_comments(&self, post_id: PostId) -> crate::Result<Vec<CommentRecord>>;

    /// Fetch a single author
    async fn get_author(&self, author_id: AuthorId) -> crate::Result<Author>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
