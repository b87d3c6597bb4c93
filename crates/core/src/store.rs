//! Store trait definitions for data access abstraction.
//!
//! All store operations are async; they are the only suspension points of a
//! request. Implementations live in `timekeeper-db` (PostgreSQL) and in
//! [`crate::memory`].

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::fields::{FieldSpec, FieldValue};
use crate::models::{ChildEntity, Entity, Project, Session, Task, User};

/// Generic per-entity document store.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<E>>;

    async fn find_all(&self) -> CoreResult<Vec<E>>;

    /// Persist a draft; the store assigns the id.
    async fn insert(&self, draft: E::Draft) -> CoreResult<E>;

    /// Full-document replace, keyed by `entity.id()`.
    async fn save(&self, entity: &E) -> CoreResult<E>;

    /// Targeted single-field write.
    ///
    /// Returns whether the store acknowledged the write. Writes to different
    /// fields of the same document never clobber each other.
    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue)
        -> CoreResult<bool>;

    /// Returns `true` if a document was removed.
    async fn delete_by_id(&self, id: &str) -> CoreResult<bool>;
}

/// Store for entities owned by a parent document.
#[async_trait]
pub trait ChildStore<E: ChildEntity>: EntityStore<E> {
    async fn find_all_by_parent_id(&self, parent_id: &str) -> CoreResult<Vec<E>>;

    /// Returns the number of removed documents.
    async fn delete_all_by_parent_id(&self, parent_id: &str) -> CoreResult<u64>;
}

#[async_trait]
pub trait SessionStore: ChildStore<Session> {
    async fn find_all_by_user_id(&self, user_id: &str) -> CoreResult<Vec<Session>>;

    async fn delete_all_by_user_id(&self, user_id: &str) -> CoreResult<u64>;
}

#[async_trait]
pub trait UserStore: EntityStore<User> {
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    async fn find_by_token(&self, token: &str) -> CoreResult<Option<User>>;

    async fn find_by_name_and_reset_token(
        &self,
        name: &str,
        reset_token: &str,
    ) -> CoreResult<Option<User>>;
}

/// Access to every store a service may touch.
pub trait Stores: Send + Sync + 'static {
    type Projects: EntityStore<Project>;
    type Tasks: ChildStore<Task>;
    type Sessions: SessionStore;
    type Users: UserStore;

    fn projects(&self) -> &Self::Projects;
    fn tasks(&self) -> &Self::Tasks;
    fn sessions(&self) -> &Self::Sessions;
    fn users(&self) -> &Self::Users;
}
