//! # Generic Store Actor
//!
//! This module defines the `ResourceActor`, the component that owns a [`ResourceStore`] for the
//! lifetime of the service. It implements the "Server" side of the Actor Model: requests arrive
//! on a channel and are processed one at a time, so store operations never interleave.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::{FrameworkError, StoreError};
use crate::message::ResourceRequest;
use crate::store::ResourceStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns the store for one resource type.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`) and the receiver
/// end of the channel. Pipeline stages only ever hold a [`ResourceClient`], never the store.
///
/// **Concurrency Model**:
/// Many requests may be suspended inside the pipeline at once, but each store operation is one
/// message and runs to completion before the next is received. No `Mutex` or `RwLock` is
/// needed for the `store`.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Seed** (optional): Insert initial entities with [`ResourceActor::seed`].
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use rest_framework::{Fields, Record, ResourceActor};
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[tokio::main]
/// async fn main() {
///     let counter = AtomicU64::new(1);
///     let (actor, client) = ResourceActor::<Record>::new(10, move || {
///         format!("post_{}", counter.fetch_add(1, Ordering::SeqCst))
///     });
///     tokio::spawn(actor.run());
///
///     let post = client.create(Fields::new().with("content", "hi")).await.unwrap();
///     assert_eq!(post.id, "post_1");
/// }
/// ```
pub struct ResourceActor<T: ResourceEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: ResourceStore<T>,
}

impl<T: ResourceEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `next_id_fn` - Generator for fresh entity ids.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_size` is 0.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: ResourceStore::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Inserts initial entities before the loop starts.
    pub fn seed(mut self, items: impl IntoIterator<Item = T::Create>) -> Result<Self, StoreError> {
        for params in items {
            self.store.create(params)?;
        }
        Ok(self)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Record" instead of "rest_framework::record::Record")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.store.create(params).map_err(FrameworkError::from);
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.store.len(), "Created")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.list_all()));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get_by_id(&id).ok().cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.store.update(&id, update).map_err(FrameworkError::from);
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(FrameworkError::NotFound(_)) => warn!(entity_type, %id, "Not found"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.store.delete_by_id(&id).map_err(FrameworkError::from);
                    match &result {
                        Ok(_) => info!(entity_type, %id, size = self.store.len(), "Deleted"),
                        Err(_) => warn!(entity_type, %id, "Not found"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
