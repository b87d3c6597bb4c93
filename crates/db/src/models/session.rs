use sqlx::FromRow;
use timekeeper_core::models::Session;
use timekeeper_core::types::Timestamp;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: String,
    pub task_id: String,
    pub user_id: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            task_id: row.task_id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}
