use sqlx::FromRow;
use timekeeper_core::error::{CoreError, CoreResult};
use timekeeper_core::models::Task;
use timekeeper_core::types::Timestamp;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub project_id: String,
    pub current_at: Option<Timestamp>,
    pub priority: String,
    pub status: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> CoreResult<Self> {
        Ok(Task {
            id: row.id,
            name: row.name,
            description: row.description,
            project_id: row.project_id,
            current_time: row.current_at,
            priority: super::decode_enum("tasks", "priority", &row.priority)?,
            status: super::decode_enum("tasks", "status", &row.status)?,
        })
    }
}
