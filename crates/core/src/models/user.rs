//! User account model and DTOs.

use serde::{Deserialize, Serialize};

use super::{field_mismatch, Entity};
use crate::error::CoreResult;
use crate::fields::{FieldSpec, FieldValue};
use crate::types::{EntityId, Timestamp};

/// A user account.
///
/// The password hash and the activation / reset secrets are never serialized.
/// The session `token` is, so that a login response hands it to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub active: bool,
    #[serde(skip_serializing)]
    pub activation_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_task: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_project: Option<EntityId>,
}

/// A registered, not yet inserted user. `password` is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub activation_token: String,
}

/// Raw account payload used by register, login, activate and reset flows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub activation_token: Option<String>,
    pub reset_password_token: Option<String>,
}

impl Entity for User {
    const NAME: &'static str = "User";
    type Draft = NewUser;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            password: draft.password,
            active: false,
            activation_token: Some(draft.activation_token),
            reset_password_token: None,
            reset_time: None,
            token: None,
            selected_task: None,
            selected_project: None,
        }
    }

    fn set_field(&mut self, field: &FieldSpec, value: FieldValue) -> CoreResult<()> {
        match (field.name, value) {
            ("selectedTask", FieldValue::TaskRef(task_id)) => self.selected_task = Some(task_id),
            (_, value) => return Err(field_mismatch(Self::NAME, field, &value)),
        }
        Ok(())
    }
}
