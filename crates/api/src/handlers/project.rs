//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeeper_core::models::ProjectDocument;
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::{ProjectService, TaskService};
use timekeeper_core::store::Stores;

use crate::error::AppResult;
use crate::handlers::bind_path_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list<S: Stores>(State(state): State<AppState<S>>) -> AppResult<impl IntoResponse> {
    let projects = ProjectService::get_all(state.stores()).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<ProjectDocument>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectService::add(state.stores(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectService::get_by_id(state.stores(), &id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Replace the whole project. Refused once the project is finished.
pub async fn update<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(mut input): Json<ProjectDocument>,
) -> AppResult<impl IntoResponse> {
    input.id = bind_path_id(id, input.id)?;
    let project = ProjectService::update(state.stores(), input).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}
pub async fn patch<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(op): Json<PatchOperation>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectService::patch(state.stores(), &id, &op).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Cascades to the project's tasks and their sessions.
pub async fn delete<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ProjectService::delete(state.stores(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list_tasks<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskService::get_all_by_project(state.stores(), &id).await?;
    Ok(Json(DataResponse { data: tasks }))
}
