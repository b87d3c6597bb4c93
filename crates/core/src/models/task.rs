//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};

use super::{field_mismatch, ChildEntity, Entity};
use crate::error::CoreResult;
use crate::fields::{serde_timestamp, FieldSpec, FieldValue};
use crate::status::{Priority, TaskStatus};
use crate::types::{EntityId, Timestamp};

/// A persisted task. Belongs to exactly one project for its whole life.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: EntityId,
    #[serde(with = "serde_timestamp", skip_serializing_if = "Option::is_none")]
    pub current_time: Option<Timestamp>,
    pub priority: Priority,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub project_id: EntityId,
    pub current_time: Option<Timestamp>,
    pub priority: Priority,
    pub status: TaskStatus,
}

/// Raw task payload for create and replace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub current_time: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl Entity for Task {
    const NAME: &'static str = "Task";
    type Draft = NewTask;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewTask) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            project_id: draft.project_id,
            current_time: draft.current_time,
            priority: draft.priority,
            status: draft.status,
        }
    }

    fn set_field(&mut self, field: &FieldSpec, value: FieldValue) -> CoreResult<()> {
        match (field.name, value) {
            ("currentTime", FieldValue::Timestamp(ts)) => self.current_time = Some(ts),
            ("priority", FieldValue::Priority(priority)) => self.priority = priority,
            ("status", FieldValue::TaskStatus(status)) => self.status = status,
            (_, value) => return Err(field_mismatch(Self::NAME, field, &value)),
        }
        Ok(())
    }
}

impl ChildEntity for Task {
    fn parent_id(&self) -> &str {
        &self.project_id
    }
}
