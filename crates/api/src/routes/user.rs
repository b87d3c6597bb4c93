//! Route definitions for the `/user` resource.

use axum::routing::{delete, get, post};
use axum::Router;
use timekeeper_core::store::Stores;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST   /register              -> register
/// POST   /activate              -> activate
/// POST   /login                 -> login
/// POST   /reset-password/mail   -> send_reset_password_mail
/// POST   /reset-password        -> reset_password
/// GET    /                      -> me            (session token)
/// PATCH  /                      -> patch         (session token)
/// GET    /sessions              -> list_sessions (session token)
/// DELETE /{id}                  -> delete        (session token)
/// ```
pub fn router<S: Stores>() -> Router<AppState<S>> {
    Router::new()
        .route("/register", post(user::register::<S>))
        .route("/activate", post(user::activate::<S>))
        .route("/login", post(user::login::<S>))
        .route(
            "/reset-password/mail",
            post(user::send_reset_password_mail::<S>),
        )
        .route("/reset-password", post(user::reset_password::<S>))
        .route("/", get(user::me).patch(user::patch::<S>))
        .route("/sessions", get(user::list_sessions::<S>))
        .route("/{id}", delete(user::delete::<S>))
}
