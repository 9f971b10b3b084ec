//! # EntityClient Trait
//!
//! Provides a common interface for resource-specific clients, adding default `list`, `get` and
//! `delete` methods built on top of a generic `ResourceClient`.

use crate::{FrameworkError, ResourceClient, ResourceEntity};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read and delete operations.
///
/// # Example
///
/// ```rust
/// use rest_framework::{EntityClient, FrameworkError, Record, ResourceClient};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct NoteError(String);
///
/// struct NoteClient {
///     inner: ResourceClient<Record>,
/// }
///
/// #[async_trait::async_trait]
/// impl EntityClient<Record> for NoteClient {
///     type Error = NoteError;
///
///     fn inner(&self) -> &ResourceClient<Record> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         NoteError(e.to_string())
///     }
/// }
///
/// async fn usage(client: NoteClient) {
///     // list(), get() and delete() are provided automatically!
///     let _ = client.list().await;
///     let _ = client.get("note_1".to_string()).await;
///     let _ = client.delete("note_1".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait EntityClient<T: ResourceEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Every entity in creation order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID, returning the removed entity.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
