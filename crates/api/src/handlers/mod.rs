pub mod project;
pub mod session;
pub mod task;
pub mod user;

use crate::error::{AppError, AppResult};

/// Reconcile the id in a replace body with the one in the URL path.
///
/// A missing body id takes the path id; a differing one is rejected.
pub(crate) fn bind_path_id(path_id: String, body_id: Option<String>) -> AppResult<Option<String>> {
    match body_id {
        None => Ok(Some(path_id)),
        Some(body_id) if body_id == path_id => Ok(Some(body_id)),
        Some(body_id) => Err(AppError::BadRequest(format!(
            "Body id '{body_id}' does not match path id '{path_id}'"
        ))),
    }
}
