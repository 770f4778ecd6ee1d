//! In-memory backend for exercising the aggregator without a network.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{Author, AuthorId, CommentId, CommentRecord, PostId, PostRecord};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// A lookup made against [`InMemoryBackend`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Call {
    Posts,
    Comments(PostId),
    Author(AuthorId),
}

/// Dataset plus per-lookup latency and failure injection.
#[derive(Default)]
pub(crate) struct InMemoryBackend {
    posts: Vec<PostRecord>,
    comments: HashMap<PostId, Vec<CommentRecord>>,
    authors: HashMap<AuthorId, Author>,
    latency: Duration,
    comment_latency: HashMap<PostId, Duration>,
    author_latency: HashMap<AuthorId, Duration>,
    fail_posts: bool,
    failing_comments: HashSet<PostId>,
    failing_authors: HashSet<AuthorId>,
    mislabeled_authors: HashMap<AuthorId, AuthorId>,
    panicking_authors: HashSet<AuthorId>,
    started: Mutex<Vec<Call>>,
    completed: Mutex<Vec<Call>>,
}

impl InMemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// posts=[1 by 10, 2 by 20], authors={10: Alice, 20: Bob},
    /// comments(1)=[100 by 10], comments(2)=[]
    pub(crate) fn sample() -> Self {
        Self::new()
            .with_author(10, "Alice")
            .with_author(20, "Bob")
            .with_post(1, 10, "first post")
            .with_post(2, 20, "second post")
            .with_comment(100, 1, 10, "nice post")
    }

    /// `posts` posts with `comments_per_post` comments each, authors cycling
    /// through `authors` ids starting at 1.
    pub(crate) fn generated(posts: i64, comments_per_post: i64, authors: i64) -> Self {
        let mut backend = Self::new();
        for author in 1..=authors {
            backend = backend.with_author(author, &format!("author-{author}"));
        }
        let mut comment_id = 1000;
        for post in 1..=posts {
            backend = backend.with_post(post, (post % authors) + 1, &format!("post-{post}"));
            for n in 0..comments_per_post {
                comment_id += 1;
                let author = ((post + n) % authors) + 1;
                let content = format!("c-{comment_id}");
                backend = backend.with_comment(comment_id, post, author, &content);
            }
        }
        backend
    }

    pub(crate) fn with_author(mut self, id: i64, name: &str) -> Self {
        self.authors.insert(
            AuthorId(id),
            Author {
                id: AuthorId(id),
                name: name.to_string(),
            },
        );
        self
    }

    pub(crate) fn with_post(mut self, id: i64, author_id: i64, content: &str) -> Self {
        self.posts.push(PostRecord {
            id: PostId(id),
            author_id: AuthorId(author_id),
            content: content.to_string(),
        });
        self.comments.entry(PostId(id)).or_default();
        self
    }

    pub(crate) fn with_comment(
        mut self,
        id: i64,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Self {
        self.comments
            .entry(PostId(post_id))
            .or_default()
            .push(CommentRecord {
                id: CommentId(id),
                post_id: PostId(post_id),
                author_id: AuthorId(author_id),
                content: content.to_string(),
            });
        self
    }

    /// Latency applied to every lookup
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the default latency for the comment list of `post_id`
    pub(crate) fn with_comment_latency(mut self, post_id: i64, latency: Duration) -> Self {
        self.comment_latency.insert(PostId(post_id), latency);
        self
    }

    /// Replaces the default latency for lookups of `author_id`
    pub(crate) fn with_author_latency(mut self, author_id: i64, latency: Duration) -> Self {
        self.author_latency.insert(AuthorId(author_id), latency);
        self
    }

    pub(crate) fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub(crate) fn failing_comments(mut self, post_id: i64) -> Self {
        self.failing_comments.insert(PostId(post_id));
        self
    }

    pub(crate) fn failing_author(mut self, author_id: i64) -> Self {
        self.failing_authors.insert(AuthorId(author_id));
        self
    }

    /// Lookups of `requested` answer with the record of `returned`
    pub(crate) fn mislabeled_author(mut self, requested: i64, returned: i64) -> Self {
        self.mislabeled_authors
            .insert(AuthorId(requested), AuthorId(returned));
        self
    }

    pub(crate) fn panicking_author(mut self, author_id: i64) -> Self {
        self.panicking_authors.insert(AuthorId(author_id));
        self
    }

    pub(crate) fn started_calls(&self) -> Vec<Call> {
        self.started.lock().unwrap().clone()
    }

    pub(crate) fn completed_calls(&self) -> Vec<Call> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn author(&self, id: AuthorId) -> &Author {
        &self.authors[&id]
    }

    async fn enter(&self, call: Call, latency: Duration) {
        self.started.lock().unwrap().push(call);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn leave(&self, call: Call) {
        self.completed.lock().unwrap().push(call);
    }

    fn unavailable(call: Call) -> Error {
        Error::RequestFailed {
            url: format!("memory://{call:?}"),
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get_posts(&self) -> Result<Vec<PostRecord>> {
        let call = Call::Posts;
        self.enter(call, self.latency).await;
        self.leave(call);
        if self.fail_posts {
            return Err(Self::unavailable(call));
        }
        Ok(self.posts.clone())
    }

    async fn get_comments(&self, post_id: PostId) -> Result<Vec<CommentRecord>> {
        let call = Call::Comments(post_id);
        let latency = self
            .comment_latency
            .get(&post_id)
            .copied()
            .unwrap_or(self.latency);
        self.enter(call, latency).await;
        self.leave(call);
        if self.failing_comments.contains(&post_id) {
            return Err(Self::unavailable(call));
        }
        self.comments
            .get(&post_id)
            .cloned()
            .ok_or_else(|| Error::RequestFailed {
                url: format!("memory://{call:?}"),
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn get_author(&self, author_id: AuthorId) -> Result<Author> {
        let call = Call::Author(author_id);
        let latency = self
            .author_latency
            .get(&author_id)
            .copied()
            .unwrap_or(self.latency);
        self.enter(call, latency).await;
        self.leave(call);
        if self.panicking_authors.contains(&author_id) {
            panic!("author lookup {author_id} blew up");
        }
        if self.failing_authors.contains(&author_id) {
            return Err(Self::unavailable(call));
        }
        let lookup = self
            .mislabeled_authors
            .get(&author_id)
            .copied()
            .unwrap_or(author_id);
        self.authors
            .get(&lookup)
            .cloned()
            .ok_or_else(|| Error::RequestFailed {
                url: format!("memory://{call:?}"),
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
