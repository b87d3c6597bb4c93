//! Repository for the `projects` table.

use async_trait::async_trait;
use sqlx::PgPool;
use timekeeper_core::error::CoreResult;
use timekeeper_core::fields::{FieldSpec, FieldValue};
use timekeeper_core::models::{Entity, NewProject, Project};
use timekeeper_core::status::NamedEnum;
use timekeeper_core::store::EntityStore;

use super::{delete_where, new_id, update_column};
use crate::models::project::ProjectRow;
use crate::storage_error;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, dead_line, status";

#[derive(Clone)]
pub struct ProjectRepo {
    pool: PgPool,
}

impl ProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn upsert(&self, project: &Project) -> CoreResult<Project> {
        let query = format!(
            "INSERT INTO projects ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                dead_line = EXCLUDED.dead_line,
                status = EXCLUDED.status
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.dead_line)
            .bind(project.status.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        row.try_into()
    }
}

#[async_trait]
impl EntityStore<Project> for ProjectRepo {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .map(Project::try_from)
            .transpose()
    }

    async fn find_all(&self) -> CoreResult<Vec<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Project::try_from)
            .collect()
    }

    async fn insert(&self, draft: NewProject) -> CoreResult<Project> {
        self.upsert(&Project::from_draft(new_id(), draft)).await
    }

    async fn save(&self, project: &Project) -> CoreResult<Project> {
        self.upsert(project).await
    }

    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue) -> CoreResult<bool> {
        update_column(&self.pool, "projects", id, field, value).await
    }

    async fn delete_by_id(&self, id: &str) -> CoreResult<bool> {
        Ok(delete_where(&self.pool, "projects", "id", id).await? > 0)
    }
}
