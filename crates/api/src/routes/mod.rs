pub mod health;
pub mod project;
pub mod session;
pub mod task;
pub mod user;

use axum::Router;
use timekeeper_core::store::Stores;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list, create
/// /projects/{id}                     get, replace, patch, delete (cascades)
/// /projects/{id}/tasks               tasks of the project
///
/// /tasks                             list, create
/// /tasks/{id}                        get, replace, patch, delete (cascades)
/// /tasks/{id}/sessions               sessions of the task
///
/// /sessions                          list, create
/// /sessions/{id}                     get, replace, patch, delete
///
/// /user/register                     register (public)
/// /user/activate                     activate (public)
/// /user/login                        login (public)
/// /user/reset-password/mail          request reset mail (public)
/// /user/reset-password               reset password (public)
/// /user                              get, patch selection (session token)
/// /user/sessions                     own sessions (session token)
/// /user/{id}                         delete own account (session token)
/// ```
pub fn api_routes<S: Stores>() -> Router<AppState<S>> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/sessions", session::router())
        .nest("/user", user::router())
}
