//! Repository for the `sessions` table.

use async_trait::async_trait;
use sqlx::PgPool;
use timekeeper_core::error::CoreResult;
use timekeeper_core::fields::{FieldSpec, FieldValue};
use timekeeper_core::models::{Entity, NewSession, Session};
use timekeeper_core::store::{ChildStore, EntityStore, SessionStore};

use super::{delete_where, new_id, update_column};
use crate::models::session::SessionRow;
use crate::storage_error;

const COLUMNS: &str = "id, task_id, user_id, start_time, end_time";

#[derive(Clone)]
pub struct SessionRepo {
    pool: PgPool,
}

impl SessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, session: &Session) -> CoreResult<Session> {
        let query = format!(
            "INSERT INTO sessions ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                task_id = EXCLUDED.task_id,
                user_id = EXCLUDED.user_id,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(&session.id)
            .bind(&session.task_id)
            .bind(&session.user_id)
            .bind(session.start_time)
            .bind(session.end_time)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn select(&self, filter: &str, value: Option<&str>) -> CoreResult<Vec<Session>> {
        let query = format!("SELECT {COLUMNS} FROM sessions {filter} ORDER BY start_time, id");
        let mut query = sqlx::query_as::<_, SessionRow>(&query);
        if let Some(value) = value {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage_error)?;
        Ok(rows.into_iter().map(Session::from).collect())
    }
}

#[async_trait]
impl EntityStore<Session> for SessionRepo {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Session>> {
        Ok(self.select("WHERE id = $1", Some(id)).await?.into_iter().next())
    }

    async fn find_all(&self) -> CoreResult<Vec<Session>> {
        self.select("", None).await
    }

    async fn insert(&self, draft: NewSession) -> CoreResult<Session> {
        self.upsert(&Session::from_draft(new_id(), draft)).await
    }

    async fn save(&self, session: &Session) -> CoreResult<Session> {
        self.upsert(session).await
    }

    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue) -> CoreResult<bool> {
        update_column(&self.pool, "sessions", id, field, value).await
    }

    async fn delete_by_id(&self, id: &str) -> CoreResult<bool> {
        Ok(delete_where(&self.pool, "sessions", "id", id).await? > 0)
    }
}

#[async_trait]
impl ChildStore<Session> for SessionRepo {
    async fn find_all_by_parent_id(&self, task_id: &str) -> CoreResult<Vec<Session>> {
        self.select("WHERE task_id = $1", Some(task_id)).await
    }

    async fn delete_all_by_parent_id(&self, task_id: &str) -> CoreResult<u64> {
        delete_where(&self.pool, "sessions", "task_id", task_id).await
    }
}

#[async_trait]
impl SessionStore for SessionRepo {
    async fn find_all_by_user_id(&self, user_id: &str) -> CoreResult<Vec<Session>> {
        self.select("WHERE user_id = $1", Some(user_id)).await
    }

    async fn delete_all_by_user_id(&self, user_id: &str) -> CoreResult<u64> {
        delete_where(&self.pool, "sessions", "user_id", user_id).await
    }
}
