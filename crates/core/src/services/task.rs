use crate::engine;
use crate::error::CoreResult;
use crate::models::{Project, Task, TaskDocument};
use crate::patch::PatchOperation;
use crate::status::TaskStatus;
use crate::store::{ChildStore, EntityStore, Stores};
use crate::validation::entity::{
    ensure_project_accepts_tasks, replacement_id, validate_new_task, validate_task_replacement,
};

pub struct TaskService;

impl TaskService {
    pub async fn get_all<S: Stores>(stores: &S) -> CoreResult<Vec<Task>> {
        stores.tasks().find_all().await
    }

    pub async fn get_by_id<S: Stores>(stores: &S, id: &str) -> CoreResult<Task> {
        engine::fetch(stores.tasks(), id).await
    }

    /// Tasks of an existing project.
    pub async fn get_all_by_project<S: Stores>(stores: &S, project_id: &str) -> CoreResult<Vec<Task>> {
        let project: Project = engine::fetch(stores.projects(), project_id).await?;
        stores.tasks().find_all_by_parent_id(&project.id).await
    }

    /// Create a task under an existing, unfinished project.
    pub async fn add<S: Stores>(stores: &S, doc: TaskDocument) -> CoreResult<Task> {
        let draft = validate_new_task(doc)?;
        let project: Project = engine::fetch(stores.projects(), &draft.project_id).await?;
        ensure_project_accepts_tasks(&project)?;

        let task = stores.tasks().insert(draft).await?;
        tracing::info!(task_id = %task.id, project_id = %task.project_id, "Task created");
        Ok(task)
    }

    pub async fn update<S: Stores>(stores: &S, doc: TaskDocument) -> CoreResult<Task> {
        let id = replacement_id("Task", &doc.id)?;
        let current: Task = engine::fetch(stores.tasks(), &id).await?;
        let replacement = validate_task_replacement(doc, &current)?;
        let task = stores.tasks().save(&replacement).await?;
        tracing::info!(task_id = %task.id, "Task replaced");
        Ok(task)
    }

    pub async fn patch<S: Stores>(stores: &S, id: &str, op: &PatchOperation) -> CoreResult<Task> {
        engine::apply_patch(stores.tasks(), id, op).await
    }

    pub async fn set_status<S: Stores>(stores: &S, id: &str, status: TaskStatus) -> CoreResult<Task> {
        let task: Task = engine::fetch(stores.tasks(), id).await?;
        engine::set_task_status(stores.tasks(), &task, status).await
    }

    /// Delete the task and its sessions.
    pub async fn delete<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
        engine::delete_task(stores, id).await
    }
}
