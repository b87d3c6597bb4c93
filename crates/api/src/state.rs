use std::sync::Arc;

use timekeeper_core::accounts::AccountDeps;
use timekeeper_core::store::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState<S>>`.
///
/// Generic over the store bundle so the same router serves PostgreSQL and the
/// in-memory store.
pub struct AppState<S> {
    /// Project, task, session and user stores.
    pub stores: Arc<S>,
    /// Hashing, mail, token and clock collaborators for the account flows.
    pub accounts: AccountDeps,
    pub config: Arc<ServerConfig>,
    /// Database pool for the health probe; `None` when running in memory.
    pub pool: Option<timekeeper_db::DbPool>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            accounts: self.accounts.clone(),
            config: Arc::clone(&self.config),
            pool: self.pool.clone(),
        }
    }
}

impl<S: Stores> AppState<S> {
    pub fn stores(&self) -> &S {
        &self.stores
    }
}
