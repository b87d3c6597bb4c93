use sqlx::FromRow;
use timekeeper_core::models::User;
use timekeeper_core::types::Timestamp;

/// A row from the `users` table. `password` holds the hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub active: bool,
    pub activation_token: Option<String>,
    pub reset_password_token: Option<String>,
    pub reset_time: Option<Timestamp>,
    pub token: Option<String>,
    pub selected_task: Option<String>,
    pub selected_project: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            active: row.active,
            activation_token: row.activation_token,
            reset_password_token: row.reset_password_token,
            reset_time: row.reset_time,
            token: row.token,
            selected_task: row.selected_task,
            selected_project: row.selected_project,
        }
    }
}
