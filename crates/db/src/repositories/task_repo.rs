//! Repository for the `tasks` table.

use async_trait::async_trait;
use sqlx::PgPool;
use timekeeper_core::error::CoreResult;
use timekeeper_core::fields::{FieldSpec, FieldValue};
use timekeeper_core::models::{Entity, NewTask, Task};
use timekeeper_core::status::NamedEnum;
use timekeeper_core::store::{ChildStore, EntityStore};

use super::{delete_where, new_id, update_column};
use crate::models::task::TaskRow;
use crate::storage_error;

const COLUMNS: &str = "id, name, description, project_id, current_at, priority, status";

#[derive(Clone)]
pub struct TaskRepo {
    pool: PgPool,
}

impl TaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, task: &Task) -> CoreResult<Task> {
        let query = format!(
            "INSERT INTO tasks ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                project_id = EXCLUDED.project_id,
                current_at = EXCLUDED.current_at,
                priority = EXCLUDED.priority,
                status = EXCLUDED.status
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(&task.id)
            .bind(&task.name)
            .bind(&task.description)
            .bind(&task.project_id)
            .bind(task.current_time)
            .bind(task.priority.as_str())
            .bind(task.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        row.try_into()
    }

    async fn select(&self, filter: &str, value: Option<&str>) -> CoreResult<Vec<Task>> {
        let query = format!("SELECT {COLUMNS} FROM tasks {filter} ORDER BY id");
        let mut query = sqlx::query_as::<_, TaskRow>(&query);
        if let Some(value) = value {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }
}

#[async_trait]
impl EntityStore<Task> for TaskRepo {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Task>> {
        Ok(self.select("WHERE id = $1", Some(id)).await?.into_iter().next())
    }

    async fn find_all(&self) -> CoreResult<Vec<Task>> {
        self.select("", None).await
    }

    async fn insert(&self, draft: NewTask) -> CoreResult<Task> {
        self.upsert(&Task::from_draft(new_id(), draft)).await
    }

    async fn save(&self, task: &Task) -> CoreResult<Task> {
        self.upsert(task).await
    }

    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue) -> CoreResult<bool> {
        update_column(&self.pool, "tasks", id, field, value).await
    }

    async fn delete_by_id(&self, id: &str) -> CoreResult<bool> {
        Ok(delete_where(&self.pool, "tasks", "id", id).await? > 0)
    }
}

#[async_trait]
impl ChildStore<Task> for TaskRepo {
    async fn find_all_by_parent_id(&self, project_id: &str) -> CoreResult<Vec<Task>> {
        self.select("WHERE project_id = $1", Some(project_id)).await
    }

    async fn delete_all_by_parent_id(&self, project_id: &str) -> CoreResult<u64> {
        delete_where(&self.pool, "tasks", "project_id", project_id).await
    }
}
