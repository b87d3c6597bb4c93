//! Repository for the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;
use timekeeper_core::error::CoreResult;
use timekeeper_core::fields::{FieldSpec, FieldValue};
use timekeeper_core::models::{Entity, NewUser, User};
use timekeeper_core::store::{EntityStore, UserStore};

use super::{delete_where, new_id, update_column};
use crate::models::user::UserRow;
use crate::storage_error;

const COLUMNS: &str = "id, name, email, password, active, activation_token, \
                       reset_password_token, reset_time, token, selected_task, selected_project";

#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, user: &User) -> CoreResult<User> {
        let query = format!(
            "INSERT INTO users ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                active = EXCLUDED.active,
                activation_token = EXCLUDED.activation_token,
                reset_password_token = EXCLUDED.reset_password_token,
                reset_time = EXCLUDED.reset_time,
                token = EXCLUDED.token,
                selected_task = EXCLUDED.selected_task,
                selected_project = EXCLUDED.selected_project
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.active)
            .bind(&user.activation_token)
            .bind(&user.reset_password_token)
            .bind(user.reset_time)
            .bind(&user.token)
            .bind(&user.selected_task)
            .bind(&user.selected_project)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn find_one(&self, filter: &str, values: &[&str]) -> CoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE {filter} LIMIT 1");
        let mut query = sqlx::query_as::<_, UserRow>(&query);
        for value in values {
            query = query.bind(*value);
        }
        let row = query.fetch_optional(&self.pool).await.map_err(storage_error)?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl EntityStore<User> for UserRepo {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        self.find_one("id = $1", &[id]).await
    }

    async fn find_all(&self) -> CoreResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY name");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert(&self, draft: NewUser) -> CoreResult<User> {
        self.upsert(&User::from_draft(new_id(), draft)).await
    }

    async fn save(&self, user: &User) -> CoreResult<User> {
        self.upsert(user).await
    }

    async fn update_field(&self, id: &str, field: &FieldSpec, value: &FieldValue) -> CoreResult<bool> {
        update_column(&self.pool, "users", id, field, value).await
    }

    async fn delete_by_id(&self, id: &str) -> CoreResult<bool> {
        Ok(delete_where(&self.pool, "users", "id", id).await? > 0)
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<User>> {
        self.find_one("name = $1", &[name]).await
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        self.find_one("email = $1", &[email]).await
    }

    async fn find_by_token(&self, token: &str) -> CoreResult<Option<User>> {
        self.find_one("token = $1", &[token]).await
    }

    async fn find_by_name_and_reset_token(
        &self,
        name: &str,
        reset_token: &str,
    ) -> CoreResult<Option<User>> {
        self.find_one("name = $1 AND reset_password_token = $2", &[name, reset_token])
            .await
    }
}
