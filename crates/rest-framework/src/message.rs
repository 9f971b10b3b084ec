//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map directly to the store operations:
///
/// - **Create**: Lifecycle start. Uses [`ResourceEntity::Create`] to initialize a new resource.
/// - **List**: Snapshot of every resource in creation order.
/// - **Get (Read)**: Fetches the current state of one resource by ID.
/// - **Update**: Uses [`ResourceEntity::Update`] to modify an existing resource in place.
/// - **Delete**: Lifecycle end. Removes the resource.
///
/// This type is generic over `T: ResourceEntity`, so a payload for one resource type can't be
/// sent to a store of another.
#[derive(Debug)]
pub enum ResourceRequest<T: ResourceEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
}
