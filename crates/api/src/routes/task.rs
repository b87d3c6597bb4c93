//! Route definitions for the `/tasks` resource.

use axum::routing::get;
use axum::Router;
use timekeeper_core::store::Stores;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// PATCH  /{id}           -> patch
/// DELETE /{id}           -> delete
/// GET    /{id}/sessions  -> list_sessions
/// ```
pub fn router<S: Stores>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(task::list::<S>).post(task::create::<S>))
        .route(
            "/{id}",
            get(task::get_by_id::<S>)
                .put(task::update::<S>)
                .patch(task::patch::<S>)
                .delete(task::delete::<S>),
        )
        .route("/{id}/sessions", get(task::list_sessions::<S>))
}
