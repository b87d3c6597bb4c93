//! Store implementations over a shared [`PgPool`].
//!
//! Each repo holds a pool handle (cheap to clone) and implements the core
//! store traits for one table.

mod project_repo;
mod session_repo;
mod task_repo;
mod user_repo;

pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

use sqlx::PgPool;
use timekeeper_core::error::CoreResult;
use timekeeper_core::fields::{FieldSpec, FieldValue};
use timekeeper_core::status::NamedEnum;
use timekeeper_core::store::Stores;
use timekeeper_core::types::EntityId;

use crate::storage_error;

/// Store-assigned id for a new row.
fn new_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}

/// Write a single column of one row. Returns whether a row was updated.
///
/// `field.column` comes from the static field tables, never from input.
async fn update_column(
    pool: &PgPool,
    table: &str,
    id: &str,
    field: &FieldSpec,
    value: &FieldValue,
) -> CoreResult<bool> {
    let query = format!("UPDATE {table} SET {} = $2 WHERE id = $1", field.column);
    let query = sqlx::query(&query).bind(id);
    let query = match value {
        FieldValue::Text(text) => query.bind(text.clone()),
        FieldValue::Date(date) => query.bind(*date),
        FieldValue::Timestamp(ts) => query.bind(*ts),
        FieldValue::ProjectStatus(status) => query.bind(status.as_str()),
        FieldValue::TaskStatus(status) => query.bind(status.as_str()),
        FieldValue::Priority(priority) => query.bind(priority.as_str()),
        FieldValue::TaskRef(task_id) => query.bind(task_id.clone()),
    };
    let result = query.execute(pool).await.map_err(storage_error)?;
    Ok(result.rows_affected() > 0)
}

async fn delete_where(pool: &PgPool, table: &str, column: &str, value: &str) -> CoreResult<u64> {
    let query = format!("DELETE FROM {table} WHERE {column} = $1");
    let result = sqlx::query(&query)
        .bind(value)
        .execute(pool)
        .await
        .map_err(storage_error)?;
    Ok(result.rows_affected())
}

/// The four repos sharing one pool.
#[derive(Clone)]
pub struct PgStores {
    projects: ProjectRepo,
    tasks: TaskRepo,
    sessions: SessionRepo,
    users: UserRepo,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepo::new(pool.clone()),
            tasks: TaskRepo::new(pool.clone()),
            sessions: SessionRepo::new(pool.clone()),
            users: UserRepo::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.projects.pool()
    }
}

impl Stores for PgStores {
    type Projects = ProjectRepo;
    type Tasks = TaskRepo;
    type Sessions = SessionRepo;
    type Users = UserRepo;

    fn projects(&self) -> &ProjectRepo {
        &self.projects
    }

    fn tasks(&self) -> &TaskRepo {
        &self.tasks
    }

    fn sessions(&self) -> &SessionRepo {
        &self.sessions
    }

    fn users(&self) -> &UserRepo {
        &self.users
    }
}
