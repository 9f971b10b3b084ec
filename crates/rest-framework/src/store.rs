//! # Ordered In-Memory Store
//!
//! [`ResourceStore`] is the authoritative holder of every entity of one resource type. It is a
//! plain synchronous data structure: the [`ResourceActor`](crate::actor::ResourceActor) owns one
//! and serialises access to it, and tests can drive it directly.
//!
//! ## Invariants
//!
//! - Ids come from the injected generator and are never handed out twice, even after the entity
//!   holding one is deleted.
//! - Enumeration follows creation order; deletion removes the entry without reordering survivors.
//! - A deleted id is unreachable for every later read, update or delete.

use crate::entity::ResourceEntity;
use crate::error::StoreError;
use std::collections::HashSet;

pub struct ResourceStore<T: ResourceEntity> {
    entries: Vec<T>,
    /// Every id ever handed out. Never pruned on delete, so retired ids stay unusable.
    issued: HashSet<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: ResourceEntity> ResourceStore<T> {
    pub fn new(next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static) -> Self {
        Self {
            entries: Vec::new(),
            issued: HashSet::new(),
            next_id_fn: Box::new(next_id_fn),
        }
    }

    /// Generates a fresh id and appends the new entity at the end.
    pub fn create(&mut self, params: T::Create) -> Result<T, StoreError> {
        let id = (self.next_id_fn)();
        if self.issued.contains(&id) {
            return Err(StoreError::DuplicateId(id.to_string()));
        }

        let item = T::from_create_params(id.clone(), params).map_err(StoreError::entity)?;
        self.issued.insert(id);
        self.entries.push(item.clone());
        Ok(item)
    }

    /// Snapshot of every entity in insertion order.
    pub fn list_all(&self) -> Vec<T> {
        self.entries.clone()
    }

    pub fn get_by_id(&self, id: &T::Id) -> Result<&T, StoreError> {
        self.entries
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Applies `update` to the entity with `id`, keeping its position.
    ///
    /// The hook runs against a copy, so a failing update leaves the stored entity untouched.
    pub fn update(&mut self, id: &T::Id, update: T::Update) -> Result<T, StoreError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut updated = slot.clone();
        updated.on_update(update).map_err(StoreError::entity)?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Removes the entity with `id` and hands it back.
    pub fn delete_by_id(&mut self, id: &T::Id) -> Result<T, StoreError> {
        let index = self
            .entries
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
