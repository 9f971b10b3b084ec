//! # Posts Client
//!
//! Provides a high-level API for the posts store.
//! It wraps a `ResourceClient<Record>` and exposes domain-specific methods.

use async_trait::async_trait;
use rest_framework::{EntityClient, Fields, FrameworkError, HttpError, Record, ResourceClient};
use tracing::{debug, instrument};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PostsError {
    #[error("Post not found: {0}")]
    NotFound(String),
    #[error("Posts store unavailable: {0}")]
    Store(String),
}

impl From<PostsError> for HttpError {
    fn from(e: PostsError) -> Self {
        match e {
            PostsError::NotFound(_) => HttpError::not_found(e.to_string()),
            PostsError::Store(_) => HttpError::msg(e.to_string()),
        }
    }
}

/// Client for the posts store.
#[derive(Clone)]
pub struct PostsClient {
    inner: ResourceClient<Record>,
}

impl PostsClient {
    pub fn new(inner: ResourceClient<Record>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EntityClient<Record> for PostsClient {
    type Error = PostsError;

    fn inner(&self) -> &ResourceClient<Record> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => PostsError::NotFound(id),
            other => PostsError::Store(other.to_string()),
        }
    }
}

impl PostsClient {
    /// Creates a post from whichever of `username` and `content` are present.
    #[instrument(skip(self))]
    pub async fn create_post(&self, fields: Fields) -> Result<Record, PostsError> {
        debug!("Sending request");
        let post = post_fields(fields);
        self.inner.create(post).await.map_err(Self::map_error)
    }

    /// Replaces the content of post `id`. Other fields are left alone.
    #[instrument(skip(self))]
    pub async fn update_content(
        &self,
        id: String,
        content: Option<String>,
    ) -> Result<Record, PostsError> {
        debug!("Sending request");
        let update = content
            .map(|c| Fields::new().with("content", c))
            .unwrap_or_default();
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

fn post_fields(body: Fields) -> Fields {
    ["username", "content"]
        .into_iter()
        .filter_map(|name| body.get(name).map(|value| (name, value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_framework::mock::MockClient;

    #[tokio::test]
    async fn create_keeps_only_post_fields() {
        let mut mock = MockClient::<Record>::new();
        mock.expect_create().return_ok(Record {
            id: "p1".into(),
            fields: Fields::new().with("username", "Bob").with("content", "hi"),
        });
        let client = PostsClient::new(mock.client());

        let post = client
            .create_post(
                Fields::new()
                    .with("content", "hi")
                    .with("username", "Bob")
                    .with("admin", "true"),
            )
            .await
            .unwrap();
        assert_eq!(post.id, "p1");
        mock.verify();

        assert_eq!(
            post_fields(Fields::new().with("content", "hi").with("admin", "true")),
            Fields::new().with("content", "hi")
        );
    }

    #[tokio::test]
    async fn missing_post_maps_to_not_found() {
        let mut mock = MockClient::<Record>::new();
        mock.expect_update("ghost".to_string())
            .return_err(FrameworkError::NotFound("ghost".into()));
        let client = PostsClient::new(mock.client());

        let err = client
            .update_content("ghost".into(), Some("x".into()))
            .await
            .unwrap_err();
        assert_eq!(err, PostsError::NotFound("ghost".into()));
        assert_eq!(HttpError::from(err).status(), Some(404));
        mock.verify();
    }
}
