//! Work session model and DTOs.

use serde::{Deserialize, Serialize};

use super::{field_mismatch, ChildEntity, Entity};
use crate::error::CoreResult;
use crate::fields::{serde_timestamp, FieldSpec, FieldValue};
use crate::types::{EntityId, Timestamp};

/// A span of work on a task, optionally attributed to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: EntityId,
    pub task_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    #[serde(serialize_with = "serialize_start")]
    pub start_time: Timestamp,
    #[serde(with = "serde_timestamp", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
}

fn serialize_start<S: serde::Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serde_timestamp::serialize(&Some(*ts), serializer)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub task_id: EntityId,
    pub user_id: Option<EntityId>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

/// Raw session payload for create and replace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub id: Option<String>,
    pub task_id: Option<String>,
    pub user_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl Entity for Session {
    const NAME: &'static str = "Session";
    type Draft = NewSession;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewSession) -> Self {
        Self {
            id,
            task_id: draft.task_id,
            user_id: draft.user_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
        }
    }

    fn set_field(&mut self, field: &FieldSpec, value: FieldValue) -> CoreResult<()> {
        match (field.name, value) {
            ("startTime", FieldValue::Timestamp(ts)) => self.start_time = ts,
            ("endTime", FieldValue::Timestamp(ts)) => self.end_time = Some(ts),
            (_, value) => return Err(field_mismatch(Self::NAME, field, &value)),
        }
        Ok(())
    }
}

impl ChildEntity for Session {
    fn parent_id(&self) -> &str {
        &self.task_id
    }
}
