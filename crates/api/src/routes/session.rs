//! Route definitions for the `/sessions` resource.

use axum::routing::get;
use axum::Router;
use timekeeper_core::store::Stores;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
pub fn router<S: Stores>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(session::list::<S>).post(session::create::<S>))
        .route(
            "/{id}",
            get(session::get_by_id::<S>)
                .put(session::update::<S>)
                .patch(session::patch::<S>)
                .delete(session::delete::<S>),
        )
}
