//! Handlers for the `/sessions` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeeper_core::models::SessionDocument;
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::SessionService;
use timekeeper_core::store::Stores;

use crate::error::AppResult;
use crate::handlers::bind_path_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions
pub async fn list<S: Stores>(State(state): State<AppState<S>>) -> AppResult<impl IntoResponse> {
    let sessions = SessionService::get_all(state.stores()).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/sessions
///
/// Starting a session on a task that is ready to start moves the task to
/// IN_PROGRESS.
pub async fn create<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<SessionDocument>,
) -> AppResult<impl IntoResponse> {
    let clock = state.accounts.clock.as_ref();
    let session = SessionService::add(state.stores(), clock, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session = SessionService::get_by_id(state.stores(), &id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}
pub async fn update<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(mut input): Json<SessionDocument>,
) -> AppResult<impl IntoResponse> {
    input.id = bind_path_id(id, input.id)?;
    let session = SessionService::update(state.stores(), input).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PATCH /api/v1/sessions/{id}
pub async fn patch<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(op): Json<PatchOperation>,
) -> AppResult<impl IntoResponse> {
    let session = SessionService::patch(state.stores(), &id, &op).await?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete<S: Stores>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    SessionService::delete(state.stores(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
