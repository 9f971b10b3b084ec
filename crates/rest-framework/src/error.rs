//! # Framework Errors
//!
//! This module defines the common error types used by the store and its actor.
//! Pipeline-facing errors live in [`crate::pipeline::error`].

/// Errors raised by a [`ResourceStore`](crate::store::ResourceStore) operation.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Id already issued: {0}")]
    DuplicateId(String),
    #[error("Entity error: {0}")]
    Entity(String),
}

impl StoreError {
    pub(crate) fn entity(e: impl std::error::Error) -> Self {
        StoreError::Entity(e.to_string())
    }
}

/// Errors seen by a [`ResourceClient`](crate::client::ResourceClient).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Id already issued: {0}")]
    DuplicateId(String),
    #[error("Entity error: {0}")]
    EntityError(String),
}

impl From<StoreError> for FrameworkError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => FrameworkError::NotFound(id),
            StoreError::DuplicateId(id) => FrameworkError::DuplicateId(id),
            StoreError::Entity(msg) => FrameworkError::EntityError(msg),
        }
    }
}
