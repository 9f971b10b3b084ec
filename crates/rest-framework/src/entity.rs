//! # ResourceEntity Trait
//!
//! The `ResourceEntity` trait defines the contract that every stored resource must implement to be
//! held by a [`ResourceStore`](crate::store::ResourceStore) and served by a
//! [`ResourceActor`](crate::actor::ResourceActor). It specifies associated types for IDs, DTOs
//! and errors, plus the single mutation hook (`on_update`).
//!
//! # Architecture Note
//! By defining one contract that every resource type must satisfy, the store, the actor and the
//! client are written *once* and reused for posts, users, or anything else.
//!
//! We use "Associated Types" (`type Id`, `type Create`, etc.) to enforce type safety.
//! A `Record` requires `Fields` as its create payload, and you can't accidentally send it a
//! payload meant for another resource.
//!
//! # Synchronous Hooks
//! Hooks are plain functions. Store operations never suspend, so two mutations can never
//! interleave part-way through, even when many requests are in flight.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by a `ResourceStore`.
pub trait ResourceEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity (e.g., String, u64).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identifier assigned at creation. Must never change afterwards.
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the freshly generated ID and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Apply an update in place. Implementations must leave `id()` untouched.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;
}
