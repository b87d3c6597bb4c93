use sqlx::FromRow;
use timekeeper_core::error::{CoreError, CoreResult};
use timekeeper_core::models::Project;
use timekeeper_core::types::Date;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub dead_line: Option<Date>,
    pub status: Option<String>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = CoreError;

    fn try_from(row: ProjectRow) -> CoreResult<Self> {
        Ok(Project {
            id: row.id,
            name: row.name,
            description: row.description,
            dead_line: row.dead_line,
            status: row
                .status
                .as_deref()
                .map(|raw| super::decode_enum("projects", "status", raw))
                .transpose()?,
        })
    }
}
