//! In-process document store.
//!
//! Backs the server when no `DATABASE_URL` is configured and drives the
//! service tests. Each collection is a `BTreeMap` behind a `RwLock`, so a
//! single-field write holds the write lock for exactly that field update.
//!
//! [`MemoryStore::drop_writes`] and [`MemoryStore::fail_deletes`] simulate a
//! store that silently ignores field writes or errors on deletes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::fields::{FieldSpec, FieldValue};
use crate::models::{ChildEntity, Entity, Project, Session, Task, User};
use crate::store::{ChildStore, EntityStore, SessionStore, Stores, UserStore};
use crate::types::EntityId;

pub struct MemoryStore<E> {
    docs: RwLock<BTreeMap<EntityId, E>>,
    drop_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            drop_writes: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `update_field` reports the write as unacknowledged and
    /// leaves the document untouched.
    pub fn drop_writes(&self, enabled: bool) {
        self.drop_writes.store(enabled, Ordering::SeqCst);
    }

    /// When set, every delete fails with `StorageFailure`.
    pub fn fail_deletes(&self, enabled: bool) {
        self.fail_deletes.store(enabled, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, BTreeMap<EntityId, E>>> {
        self.docs
            .read()
            .map_err(|_| CoreError::StorageFailure(format!("{} store lock poisoned", E::NAME)))
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, BTreeMap<EntityId, E>>> {
        self.docs
            .write()
            .map_err(|_| CoreError::StorageFailure(format!("{} store lock poisoned", E::NAME)))
    }

    fn check_delete(&self) -> CoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CoreError::StorageFailure(format!(
                "{} store rejected the delete",
                E::NAME
            )));
        }
        Ok(())
    }

    fn find_where(&self, pred: impl Fn(&E) -> bool) -> CoreResult<Vec<E>> {
        Ok(self.read()?.values().filter(|e| pred(e)).cloned().collect())
    }

    fn find_first(&self, pred: impl Fn(&E) -> bool) -> CoreResult<Option<E>> {
        Ok(self.read()?.values().find(|e| pred(e)).cloned())
    }

    fn delete_where(&self, pred: impl Fn(&E) -> bool) -> CoreResult<u64> {
        self.check_delete()?;
        let mut docs = self.write()?;
        let before = docs.len();
        docs.retain(|_, e| !pred(e));
        Ok((before - docs.len()) as u64)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<E>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_all(&self) -> CoreResult<Vec<E>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn insert(&self, draft: E::Draft) -> CoreResult<E> {
        let entity = E::from_draft(Uuid::now_v7().to_string(), draft);
        self.write()?.insert(entity.id().to_string(), entity.clone());
        Ok(entity)
    }

    async fn save(&self, entity: &E) -> CoreResult<E> {
        self.write()?.insert(entity.id().to_string(), entity.clone());
        Ok(entity.clone())
    }

    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue) -> CoreResult<bool> {
        if self.drop_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        match self.write()?.get_mut(id) {
            Some(doc) => {
                doc.set_field(field, value.clone())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> CoreResult<bool> {
        self.check_delete()?;
        Ok(self.write()?.remove(id).is_some())
    }
}

#[async_trait]
impl<E: ChildEntity> ChildStore<E> for MemoryStore<E> {
    async fn find_all_by_parent_id(&self, parent_id: &str) -> CoreResult<Vec<E>> {
        self.find_where(|e| e.parent_id() == parent_id)
    }

    async fn delete_all_by_parent_id(&self, parent_id: &str) -> CoreResult<u64> {
        self.delete_where(|e| e.parent_id() == parent_id)
    }
}

#[async_trait]
impl SessionStore for MemoryStore<Session> {
    async fn find_all_by_user_id(&self, user_id: &str) -> CoreResult<Vec<Session>> {
        self.find_where(|s| s.user_id.as_deref() == Some(user_id))
    }

    async fn delete_all_by_user_id(&self, user_id: &str) -> CoreResult<u64> {
        self.delete_where(|s| s.user_id.as_deref() == Some(user_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore<User> {
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<User>> {
        self.find_first(|u| u.name == name)
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        self.find_first(|u| u.email == email)
    }

    async fn find_by_token(&self, token: &str) -> CoreResult<Option<User>> {
        self.find_first(|u| u.token.as_deref() == Some(token))
    }

    async fn find_by_name_and_reset_token(
        &self,
        name: &str,
        reset_token: &str,
    ) -> CoreResult<Option<User>> {
        self.find_first(|u| u.name == name && u.reset_password_token.as_deref() == Some(reset_token))
    }
}

/// The four in-memory collections.
#[derive(Default)]
pub struct MemoryStores {
    pub projects: MemoryStore<Project>,
    pub tasks: MemoryStore<Task>,
    pub sessions: MemoryStore<Session>,
    pub users: MemoryStore<User>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stores for MemoryStores {
    type Projects = MemoryStore<Project>;
    type Tasks = MemoryStore<Task>;
    type Sessions = MemoryStore<Session>;
    type Users = MemoryStore<User>;

    fn projects(&self) -> &Self::Projects {
        &self.projects
    }

    fn tasks(&self) -> &Self::Tasks {
        &self.tasks
    }

    fn sessions(&self) -> &Self::Sessions {
        &self.sessions
    }

    fn users(&self) -> &Self::Users {
        &self.users
    }
}
