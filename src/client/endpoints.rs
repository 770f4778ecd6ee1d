//! API paths and URL construction

use crate::error::{Error, Result};
use crate::types::{AuthorId, PostId};
use url::Url;

/// The endpoints of the posts API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /api/slow/posts`
    Posts,
    /// `GET /api/slow/posts/{id}/comments`
    PostComments(PostId),
    /// `GET /api/slow/authors/{id}`
    Author(AuthorId),
}

impl Endpoint {
    fn segments(&self) -> Vec<String> {
        let mut segments = vec!["api".to_string(), "slow".to_string()];
        match self {
            Endpoint::Posts => segments.push("posts".to_string()),
            Endpoint::PostComments(id) => {
                segments.extend(["posts".to_string(), id.to_string(), "comments".to_string()])
            }
            Endpoint::Author(id) => segments.extend(["authors".to_string(), id.to_string()]),
        }
        segments
    }

    /// Build the full URL of this endpoint under `base`
    ///
    /// Any path already present on `base` is kept as a prefix; a trailing slash
    /// on `base` does not produce an empty segment.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                Error::config(format!("base URL '{}' cannot carry a path", base), "base_url")
            })?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }
}
