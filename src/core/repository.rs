use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::domain::{Identifiable, IdentityRef};
use crate::core::library::LibraryResult;

// Mutations match on both the record id and the owner id in a single store call.
#[async_trait]
pub trait Repository<Entity: Identifiable>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates the mutable fields of an entity owned by entity.owner(), returns matched count
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // deletes an entity owned by owner, returns deleted count
    async fn delete(&self, id: &IdentityRef, owner: &IdentityRef) -> LibraryResult<usize>;

    // owner of an entity or None when it does not exist
    async fn owner_of(&self, id: &IdentityRef) -> LibraryResult<Option<IdentityRef>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    MongoDB,
    InMemory,
}
