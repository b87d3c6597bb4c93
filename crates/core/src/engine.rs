//! Patch engine and delete cascades.
//!
//! A patch is a single read-validate-write step: fetch the current document,
//! authorize the operation against it, convert the raw value and issue a
//! targeted single-field write. The read and the write are separate store
//! calls with no lock held in between, so two concurrent authors can both
//! validate against the same snapshot. Only the field write itself is atomic.
//!
//! Cascades are ordered delete-by-filter calls. The first failing step aborts
//! the cascade and is returned; earlier deletes are not rolled back.

use crate::error::{CoreError, CoreResult};
use crate::fields::{self, FieldValue, TASK_FIELDS};
use crate::models::{Entity, Project, Task, User};
use crate::patch::PatchOperation;
use crate::status::TaskStatus;
use crate::store::{ChildStore, EntityStore, SessionStore, Stores};
use crate::validation::patch::{validate_patch, Patchable};

/// Fetch `id` or fail with `NotFound`.
pub async fn fetch<E, S>(store: &S, id: &str) -> CoreResult<E>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found(E::NAME, id))
}

/// Apply one patch operation to the entity `id` and return the patched entity.
pub async fn apply_patch<E, S>(store: &S, id: &str, op: &PatchOperation) -> CoreResult<E>
where
    E: Patchable,
    S: EntityStore<E> + ?Sized,
{
    let mut entity: E = fetch(store, id).await?;

    let field = match validate_patch(&entity, op) {
        Ok(field) => field,
        Err(e) => {
            tracing::warn!(entity = E::NAME, id, path = %op.path, error = %e, "Patch rejected");
            return Err(e);
        }
    };
    let value = fields::convert(field, op.value.as_deref())?;
    if let Err(e) = entity.check_value(field, &value) {
        tracing::warn!(entity = E::NAME, id, path = %op.path, error = %e, "Patch rejected");
        return Err(e);
    }

    write_field::<E, S>(store, id, field, &value).await?;
    entity.set_field(field, value)?;

    tracing::info!(entity = E::NAME, id, path = %op.path, "Patch applied");
    Ok(entity)
}

/// Move `task` to `status` through a targeted write, then read it back to
/// confirm the store holds the new value.
pub async fn set_task_status<S>(store: &S, task: &Task, status: TaskStatus) -> CoreResult<Task>
where
    S: EntityStore<Task> + ?Sized,
{
    let field = fields::field(TASK_FIELDS, "status")?;
    write_field::<Task, S>(store, &task.id, field, &FieldValue::TaskStatus(status)).await?;

    let stored: Task = fetch(store, &task.id).await?;
    if stored.status != status {
        tracing::error!(task_id = %task.id, expected = %status, found = %stored.status, "Task status write not visible");
        return Err(CoreError::StorageFailure(format!(
            "Task {} status is {} after writing {status}",
            task.id, stored.status
        )));
    }

    tracing::info!(task_id = %task.id, from = %task.status, to = %status, "Task status changed");
    Ok(stored)
}

async fn write_field<E, S>(
    store: &S,
    id: &str,
    field: &fields::FieldSpec,
    value: &FieldValue,
) -> CoreResult<()>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    if store.update_field(id, field, value).await? {
        return Ok(());
    }
    tracing::error!(entity = E::NAME, id, field = field.name, "Store did not acknowledge field write");
    Err(CoreError::StorageFailure(format!(
        "Write of '{}' on {} {id} was not acknowledged",
        field.name,
        E::NAME
    )))
}

/* --------------------------------------------------------------------------
Cascades
-------------------------------------------------------------------------- */

/// Delete a project, the sessions of each of its tasks, and the tasks.
pub async fn delete_project<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
    let project: Project = fetch(stores.projects(), id).await?;

    let tasks = stores.tasks().find_all_by_parent_id(&project.id).await?;
    let mut sessions = 0;
    for task in &tasks {
        sessions += stores.sessions().delete_all_by_parent_id(&task.id).await?;
    }
    let removed_tasks = stores.tasks().delete_all_by_parent_id(&project.id).await?;
    require_deleted(stores.projects().delete_by_id(&project.id).await?, "Project", id)?;

    tracing::info!(project_id = id, tasks = removed_tasks, sessions, "Project deleted");
    Ok(())
}

/// Delete a task and its sessions.
pub async fn delete_task<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
    let task: Task = fetch(stores.tasks(), id).await?;

    let sessions = stores.sessions().delete_all_by_parent_id(&task.id).await?;
    require_deleted(stores.tasks().delete_by_id(&task.id).await?, "Task", id)?;

    tracing::info!(task_id = id, sessions, "Task deleted");
    Ok(())
}

/// Delete a user and the sessions they recorded.
pub async fn delete_user<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
    let user: User = fetch(stores.users(), id).await?;

    let sessions = stores.sessions().delete_all_by_user_id(&user.id).await?;
    require_deleted(stores.users().delete_by_id(&user.id).await?, "User", id)?;

    tracing::info!(user_id = id, sessions, "User deleted");
    Ok(())
}

pub(crate) fn require_deleted(deleted: bool, entity: &str, id: &str) -> CoreResult<()> {
    if deleted {
        Ok(())
    } else {
        Err(CoreError::StorageFailure(format!(
            "Delete of {entity} {id} was not acknowledged"
        )))
    }
}
