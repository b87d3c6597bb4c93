//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use timekeeper_core::error::CoreError;
use timekeeper_core::models::User;
use timekeeper_core::services::UserService;
use timekeeper_core::store::Stores;

use crate::error::AppError;
use crate::state::AppState;

/// The user owning the session token in the `Authorization: Bearer` header.
///
/// The token is the one handed out by `POST /user/login`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub token: String,
}

impl<S: Stores> FromRequestParts<AppState<S>> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let user = UserService::get_by_token(state.stores(), token).await?;
        Ok(SessionUser {
            user,
            token: token.to_string(),
        })
    }
}
