//! Patch authorization.
//!
//! Rules, in order:
//! 1. `op` must be `replace`
//! 2. `path` must be `/<field>` with `<field>` in the entity's field table
//! 3. fields that need a value must carry one; non-blank fields must not be blank
//! 4. status paths must follow the entity's transition table
//! 5. an entity that locks when terminal refuses every other change

use crate::error::{CoreError, CoreResult};
use crate::fields::{
    self, FieldSpec, FieldValue, PROJECT_FIELDS, SESSION_FIELDS, TASK_FIELDS, USER_FIELDS,
};
use crate::models::{Entity, Project, Session, Task, User};
use crate::patch::{PatchOperation, OP_REPLACE};
use crate::status::{ProjectStatus, StateMachine, TaskStatus};
use crate::validation::entity::check_span;

/// An entity that accepts single-field patches.
pub trait Patchable: Entity {
    /// Mutable-path whitelist.
    const FIELDS: &'static [FieldSpec];

    /// Whether the entity refuses edits in its current state.
    fn is_locked(&self) -> bool {
        false
    }

    /// Check a status change to `raw` against the transition table.
    fn check_status_change(&self, _raw: &str) -> CoreResult<()> {
        Ok(())
    }

    /// Check a converted value against the rest of the entity.
    fn check_value(&self, _field: &FieldSpec, _value: &FieldValue) -> CoreResult<()> {
        Ok(())
    }
}

impl Patchable for Project {
    const FIELDS: &'static [FieldSpec] = PROJECT_FIELDS;

    fn is_locked(&self) -> bool {
        self.effective_status().is_terminal()
    }

    fn check_status_change(&self, raw: &str) -> CoreResult<()> {
        let to: ProjectStatus = fields::parse_enum("status", raw)?;
        self.effective_status().validate_transition(to)
    }
}

// Tasks keep every field editable in DONE/CANCELED; only the transition
// table applies.
impl Patchable for Task {
    const FIELDS: &'static [FieldSpec] = TASK_FIELDS;

    fn check_status_change(&self, raw: &str) -> CoreResult<()> {
        let to: TaskStatus = fields::parse_enum("status", raw)?;
        self.status.validate_transition(to)
    }
}

impl Patchable for Session {
    const FIELDS: &'static [FieldSpec] = SESSION_FIELDS;

    fn check_value(&self, field: &FieldSpec, value: &FieldValue) -> CoreResult<()> {
        match (field.name, value) {
            ("startTime", FieldValue::Timestamp(start)) => check_span(*start, self.end_time),
            ("endTime", FieldValue::Timestamp(end)) => check_span(self.start_time, Some(*end)),
            _ => Ok(()),
        }
    }
}

impl Patchable for User {
    const FIELDS: &'static [FieldSpec] = USER_FIELDS;
}

/// Authorize `op` against the current state of `entity`.
///
/// Returns the targeted field row on success.
pub fn validate_patch<E: Patchable>(entity: &E, op: &PatchOperation) -> CoreResult<&'static FieldSpec> {
    if op.op != OP_REPLACE {
        return Err(CoreError::bad_request(format!(
            "Unsupported patch op '{}' on path '{}'. Only '{OP_REPLACE}' is allowed",
            op.op, op.path
        )));
    }

    let name = op.field_name()?;
    let field = fields::lookup(E::FIELDS, name).ok_or_else(|| {
        CoreError::bad_request(format!("Path '{}' is not patchable on {}", op.path, E::NAME))
    })?;

    let value = op.value.as_deref();
    if field.value_required && value.is_none() {
        return Err(CoreError::bad_request(format!(
            "Patch on '{}' requires a value",
            op.path
        )));
    }
    if field.non_blank && value.is_some_and(super::is_blank) {
        return Err(CoreError::bad_request(format!(
            "Patch on '{}' must not set a blank value",
            op.path
        )));
    }

    if field.kind.is_status() {
        let raw = value.unwrap_or_default();
        let transition = entity.check_status_change(raw);
        if entity.is_locked() && transition.is_err() {
            return Err(locked(E::NAME, entity.id(), op));
        }
        transition?;
    } else if entity.is_locked() {
        return Err(locked(E::NAME, entity.id(), op));
    }

    Ok(field)
}

fn locked(entity: &str, id: &str, op: &PatchOperation) -> CoreError {
    CoreError::bad_request(format!(
        "{entity} {id} is in a terminal state; '{}' cannot be set to {:?}",
        op.path, op.value
    ))
}
