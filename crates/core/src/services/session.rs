use crate::accounts::Clock;
use crate::engine;
use crate::error::CoreResult;
use crate::models::{Session, SessionDocument, Task};
use crate::patch::PatchOperation;
use crate::status::TaskStatus;
use crate::store::{ChildStore, EntityStore, SessionStore, Stores};
use crate::validation::entity::{
    ensure_task_accepts_sessions, replacement_id, validate_new_session,
    validate_session_replacement,
};

pub struct SessionService;

impl SessionService {
    pub async fn get_all<S: Stores>(stores: &S) -> CoreResult<Vec<Session>> {
        stores.sessions().find_all().await
    }

    pub async fn get_by_id<S: Stores>(stores: &S, id: &str) -> CoreResult<Session> {
        engine::fetch(stores.sessions(), id).await
    }

    pub async fn get_all_by_task<S: Stores>(stores: &S, task_id: &str) -> CoreResult<Vec<Session>> {
        let task: Task = engine::fetch(stores.tasks(), task_id).await?;
        stores.sessions().find_all_by_parent_id(&task.id).await
    }

    pub async fn get_all_by_user<S: Stores>(stores: &S, user_id: &str) -> CoreResult<Vec<Session>> {
        stores.sessions().find_all_by_user_id(user_id).await
    }

    /// Start a session on a task.
    ///
    /// A task still READY_TO_START moves to IN_PROGRESS once the session is
    /// stored.
    pub async fn add<S: Stores>(
        stores: &S,
        clock: &dyn Clock,
        doc: SessionDocument,
    ) -> CoreResult<Session> {
        let draft = validate_new_session(doc, clock.now())?;
        let task: Task = engine::fetch(stores.tasks(), &draft.task_id).await?;
        ensure_task_accepts_sessions(&task)?;

        let session = stores.sessions().insert(draft).await?;
        tracing::info!(session_id = %session.id, task_id = %task.id, "Session started");

        if task.status == TaskStatus::ReadyToStart {
            engine::set_task_status(stores.tasks(), &task, TaskStatus::InProgress).await?;
        }
        Ok(session)
    }

    pub async fn update<S: Stores>(stores: &S, doc: SessionDocument) -> CoreResult<Session> {
        let id = replacement_id("Session", &doc.id)?;
        let current: Session = engine::fetch(stores.sessions(), &id).await?;
        let replacement = validate_session_replacement(doc, &current)?;
        let session = stores.sessions().save(&replacement).await?;
        tracing::info!(session_id = %session.id, "Session replaced");
        Ok(session)
    }

    pub async fn patch<S: Stores>(stores: &S, id: &str, op: &PatchOperation) -> CoreResult<Session> {
        engine::apply_patch(stores.sessions(), id, op).await
    }

    pub async fn delete<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
        let session: Session = engine::fetch(stores.sessions(), id).await?;
        engine::require_deleted(stores.sessions().delete_by_id(&session.id).await?, "Session", id)?;
        tracing::info!(session_id = id, "Session deleted");
        Ok(())
    }
}
