use crate::clients::PostsClient;
use crate::error::AppError;
use rest_framework::{Fields, Record, ResourceActor, StoreError};
use std::num::NonZeroUsize;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

/// The three posts every fresh service starts with.
pub fn seed_posts() -> Vec<Fields> {
    [
        ("Bob", "I love web development"),
        ("Alice", "Won a hackathon"),
        ("Kelly", "#Backend Learning"),
    ]
    .into_iter()
    .map(|(username, content)| {
        Fields::new()
            .with("username", username)
            .with("content", content)
    })
    .collect()
}

/// Owns the posts store task and hands out clients to it.
pub struct PostSystem {
    pub posts_client: PostsClient,
    handle: JoinHandle<()>,
}

impl PostSystem {
    /// Seeds a store with [`seed_posts`], ids from UUID v4, and starts it.
    pub fn new(buffer_size: NonZeroUsize) -> Result<Self, StoreError> {
        Self::with_posts(buffer_size, seed_posts())
    }

    pub fn with_posts(
        buffer_size: NonZeroUsize,
        posts: impl IntoIterator<Item = Fields>,
    ) -> Result<Self, StoreError> {
        let (actor, client) =
            ResourceActor::<Record>::new(buffer_size.get(), || Uuid::new_v4().to_string());
        let actor = actor.seed(posts)?;
        let handle = tokio::spawn(actor.run());

        Ok(Self {
            posts_client: PostsClient::new(client),
            handle,
        })
    }

    /// Drops this system's client and waits for the store to stop.
    ///
    /// The store only stops once every clone of the client is gone, so anything still holding
    /// one (a running server) must be dropped first.
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down post system");
        drop(self.posts_client);
        self.handle.await?;
        Ok(())
    }
}
