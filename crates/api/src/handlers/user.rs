//! Handlers for the `/user` resource: account flows and the signed-in
//! user's own data.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeeper_core::error::CoreError;
use timekeeper_core::models::UserDocument;
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::{SessionService, UserService};
use timekeeper_core::store::Stores;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public account flows
// ---------------------------------------------------------------------------

/// POST /api/v1/user/register
///
/// Creates an inactive account and mails the activation token.
pub async fn register<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<UserDocument>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::register(state.stores(), &state.accounts, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/user/activate
pub async fn activate<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<UserDocument>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::activate(state.stores(), input).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/user/login
///
/// The response carries the session token to send as `Bearer` afterwards.
pub async fn login<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<UserDocument>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::login(state.stores(), &state.accounts, input).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/user/reset-password/mail
pub async fn send_reset_password_mail<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<UserDocument>,
) -> AppResult<StatusCode> {
    UserService::send_reset_password_mail(state.stores(), &state.accounts, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/user/reset-password
pub async fn reset_password<S: Stores>(
    State(state): State<AppState<S>>,
    Json(input): Json<UserDocument>,
) -> AppResult<StatusCode> {
    UserService::reset_password(state.stores(), &state.accounts, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Signed-in user
// ---------------------------------------------------------------------------

/// GET /api/v1/user
pub async fn me(session: SessionUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: session.user }))
}

/// PATCH /api/v1/user
///
/// Only `/selectedTask` may be replaced; the task's project becomes the
/// selected project.
pub async fn patch<S: Stores>(
    State(state): State<AppState<S>>,
    session: SessionUser,
    Json(op): Json<PatchOperation>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::patch(state.stores(), &session.token, &op).await?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/user/sessions
pub async fn list_sessions<S: Stores>(
    State(state): State<AppState<S>>,
    session: SessionUser,
) -> AppResult<impl IntoResponse> {
    let sessions = SessionService::get_all_by_user(state.stores(), &session.user.id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// DELETE /api/v1/user/{id}
///
/// Users may only delete their own account. Their sessions go with it.
pub async fn delete<S: Stores>(
    State(state): State<AppState<S>>,
    session: SessionUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if session.user.id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Users may only delete their own account".into(),
        )));
    }
    UserService::delete(state.stores(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
