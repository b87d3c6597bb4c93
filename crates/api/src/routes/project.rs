//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;
use timekeeper_core::store::Stores;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// PATCH  /{id}          -> patch
/// DELETE /{id}          -> delete
/// GET    /{id}/tasks    -> list_tasks
/// ```
pub fn router<S: Stores>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(project::list::<S>).post(project::create::<S>))
        .route(
            "/{id}",
            get(project::get_by_id::<S>)
                .put(project::update::<S>)
                .patch(project::patch::<S>)
                .delete(project::delete::<S>),
        )
        .route("/{id}/tasks", get(project::list_tasks::<S>))
}
