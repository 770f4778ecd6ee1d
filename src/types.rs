//! Core types for post-aggregator
//!
//! Records come in two flavours. Wire records (`PostRecord`, `CommentRecord`)
//! mirror the JSON the API returns. Assembled records (`Post`, `Comment`) are
//! built from a wire record plus its [`Author`] and never change afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the inner i64 value
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

id_type!(
    /// Unique identifier for a post
    PostId
);
id_type!(
    /// Unique identifier for an author
    AuthorId
);
id_type!(
    /// Unique identifier for a comment
    CommentId
);

/// An author as returned by `GET /api/slow/authors/{id}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author id
    pub id: AuthorId,
    /// Display name
    pub name: String,
}

/// A post as returned by `GET /api/slow/posts`, before its author is known
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Post id
    pub id: PostId,
    /// Id of the post's author
    pub author_id: AuthorId,
    /// Post body
    pub content: String,
}

impl PostRecord {
    /// Combine this record with its author into an assembled [`Post`]
    pub fn with_author(self, author: Author) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            content: self.content,
            author,
        }
    }
}

/// A comment as returned by `GET /api/slow/posts/{id}/comments`, before its author is known
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    /// Comment id
    pub id: CommentId,
    /// Id of the post the comment belongs to
    pub post_id: PostId,
    /// Id of the comment's author
    pub author_id: AuthorId,
    /// Comment body
    pub content: String,
}

impl CommentRecord {
    /// Combine this record with its author into an assembled [`Comment`]
    pub fn with_author(self, author: Author) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            author_id: self.author_id,
            content: self.content,
            author,
        }
    }
}

/// A post together with its author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post id
    pub id: PostId,
    /// Id of the post's author
    pub author_id: AuthorId,
    /// Post body
    pub content: String,
    /// The post's author
    pub author: Author,
}

/// A comment together with its author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id
    pub id: CommentId,
    /// Id of the post the comment belongs to
    pub post_id: PostId,
    /// Id of the comment's author
    pub author_id: AuthorId,
    /// Comment body
    pub content: String,
    /// The comment's author
    pub author: Author,
}

/// One fully assembled post: the post, its author, and its annotated comments
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithComments {
    /// The post with its author attached
    pub post: Post,
    /// Comments in the order the API returned them, each with its author attached
    pub comments: Vec<Comment>,
}

/// Outcome of a timed aggregation run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationReport {
    /// Assembled posts in source order
    pub posts: Vec<PostWithComments>,
    /// Wall-clock time spent on the run
    pub elapsed: Duration,
}

impl AggregationReport {
    /// Elapsed time in whole milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Total number of comments across all posts
    pub fn comment_count(&self) -> usize {
        self.posts.iter().map(|p| p.comments.len()).sum()
    }
}
