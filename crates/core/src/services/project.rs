use crate::engine;
use crate::error::CoreResult;
use crate::models::{Project, ProjectDocument};
use crate::patch::PatchOperation;
use crate::store::{EntityStore, Stores};
use crate::validation::entity::{replacement_id, validate_new_project, validate_project_replacement};

pub struct ProjectService;

impl ProjectService {
    pub async fn get_all<S: Stores>(stores: &S) -> CoreResult<Vec<Project>> {
        stores.projects().find_all().await
    }

    pub async fn get_by_id<S: Stores>(stores: &S, id: &str) -> CoreResult<Project> {
        engine::fetch(stores.projects(), id).await
    }

    pub async fn add<S: Stores>(stores: &S, doc: ProjectDocument) -> CoreResult<Project> {
        let draft = validate_new_project(doc)?;
        let project = stores.projects().insert(draft).await?;
        tracing::info!(project_id = %project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// Full replace. The current project must exist and be open.
    pub async fn update<S: Stores>(stores: &S, doc: ProjectDocument) -> CoreResult<Project> {
        let id = replacement_id("Project", &doc.id)?;
        let current: Project = engine::fetch(stores.projects(), &id).await?;
        let replacement = validate_project_replacement(doc, &current)?;
        let project = stores.projects().save(&replacement).await?;
        tracing::info!(project_id = %project.id, "Project replaced");
        Ok(project)
    }

    pub async fn patch<S: Stores>(stores: &S, id: &str, op: &PatchOperation) -> CoreResult<Project> {
        engine::apply_patch(stores.projects(), id, op).await
    }

    /// Delete the project with its tasks and their sessions.
    pub async fn delete<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
        engine::delete_project(stores, id).await
    }
}
