//! Handlers for the `/tasks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeeper_core::models::TaskDocument;
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::{SessionService, TaskService};
use timekeeper_core::store::Stores;

use crate::error::AppResult;
use crate::handlers::bind_path_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tasks
pub async fn list<S: Stores>(State(state): State<AppState<S>>) -> AppResult<impl IntoResponse> {
    let tasks = TaskService::get_all(state.stores()).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
///
/// The owning project must exist and must not be finished.
pub async fn create<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<TaskDocument>,
) -> AppResult<impl IntoResponse> {
    let task = TaskService::add(state.stores(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let task = TaskService::get_by_id(state.stores(), &id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(mut input): Json<TaskDocument>,
) -> AppResult<impl IntoResponse> {
    input.id = bind_path_id(id, input.id)?;
    let task = TaskService::update(state.stores(), input).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /api/v1/tasks/{id}
pub async fn patch<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(op): Json<PatchOperation>,
) -> AppResult<impl IntoResponse> {
    let task = TaskService::patch(state.stores(), &id, &op).await?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    TaskService::delete(state.stores(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tasks/{id}/sessions
pub async fn list_sessions<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let sessions = SessionService::get_all_by_task(state.stores(), &id).await?;
    Ok(Json(DataResponse { data: sessions }))
}
