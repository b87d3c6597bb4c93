//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};

use super::{field_mismatch, Entity};
use crate::error::CoreResult;
use crate::fields::{serde_date, FieldSpec, FieldValue};
use crate::status::ProjectStatus;
use crate::types::{Date, EntityId};

/// A persisted project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "serde_date", skip_serializing_if = "Option::is_none")]
    pub dead_line: Option<Date>,
    /// `None` means the project was created without a status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl Project {
    /// Effective status, treating an absent one as the initial state.
    pub fn effective_status(&self) -> ProjectStatus {
        self.status.unwrap_or(ProjectStatus::INITIAL)
    }
}

/// A validated project awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub dead_line: Option<Date>,
    pub status: Option<ProjectStatus>,
}

/// Raw project payload for create and replace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub dead_line: Option<String>,
    pub status: Option<String>,
}

impl Entity for Project {
    const NAME: &'static str = "Project";
    type Draft = NewProject;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewProject) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            dead_line: draft.dead_line,
            status: draft.status,
        }
    }

    fn set_field(&mut self, field: &FieldSpec, value: FieldValue) -> CoreResult<()> {
        match (field.name, value) {
            ("name", FieldValue::Text(Some(name))) => self.name = name,
            ("description", FieldValue::Text(description)) => self.description = description,
            ("deadLine", FieldValue::Date(date)) => self.dead_line = Some(date),
            ("status", FieldValue::ProjectStatus(status)) => self.status = Some(status),
            (_, value) => return Err(field_mismatch(Self::NAME, field, &value)),
        }
        Ok(())
    }
}
