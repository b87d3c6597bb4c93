//! Account flows: registration, activation, login, password reset and the
//! user's task selection.

use crate::accounts::AccountDeps;
use crate::engine;
use crate::error::{CoreError, CoreResult};
use crate::models::{NewUser, Task, User, UserDocument};
use crate::patch::PatchOperation;
use crate::store::{EntityStore, Stores, UserStore};
use crate::validation::patch::validate_patch;
use crate::validation::{is_blank, require_non_blank, validate_email};

pub struct UserService;

impl UserService {
    pub async fn get_by_id<S: Stores>(stores: &S, id: &str) -> CoreResult<User> {
        engine::fetch(stores.users(), id).await
    }

    /// Resolve a session token to its user.
    pub async fn get_by_token<S: Stores>(stores: &S, token: &str) -> CoreResult<User> {
        stores
            .users()
            .find_by_token(token)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("Unknown session token".into()))
    }

    pub async fn is_authenticated<S: Stores>(stores: &S, token: &str) -> CoreResult<bool> {
        if is_blank(token) {
            return Ok(false);
        }
        Ok(stores.users().find_by_token(token).await?.is_some())
    }

    /// Create an inactive account and mail its activation token.
    pub async fn register<S: Stores>(
        stores: &S,
        deps: &AccountDeps,
        doc: UserDocument,
    ) -> CoreResult<User> {
        let name = require_non_blank("name", doc.name)?;
        let email = require_non_blank("email", doc.email)?;
        let password = require_non_blank("password", doc.password)?;
        validate_email(&email)?;

        if stores.users().find_by_name(&name).await?.is_some()
            || stores.users().find_by_email(&email).await?.is_some()
        {
            tracing::warn!(name = %name, "Registration refused: user already exists");
            return Err(CoreError::Conflict("User already exists".into()));
        }

        let draft = NewUser {
            name,
            email,
            password: deps.hasher.hash(&password)?,
            activation_token: deps.tokens.token(),
        };
        let user = stores.users().insert(draft).await?;
        tracing::info!(user_id = %user.id, name = %user.name, "User registered");

        deps.mailer.send_activation_mail(&user).await?;
        Ok(user)
    }

    pub async fn activate<S: Stores>(stores: &S, doc: UserDocument) -> CoreResult<User> {
        let name = require_non_blank("name", doc.name)?;
        let mut user = find_by_name(stores, &name).await?;

        if doc.activation_token.is_none() || user.activation_token != doc.activation_token {
            tracing::warn!(user_id = %user.id, "Activation refused: token mismatch");
            return Err(CoreError::bad_request("Activation token not correct"));
        }
        if user.active {
            return Err(CoreError::Conflict(format!("User {name} already activated")));
        }

        user.active = true;
        let user = stores.users().save(&user).await?;
        tracing::info!(user_id = %user.id, "User activated");
        Ok(user)
    }

    /// Check credentials and issue a fresh session token.
    pub async fn login<S: Stores>(
        stores: &S,
        deps: &AccountDeps,
        doc: UserDocument,
    ) -> CoreResult<User> {
        let name = require_non_blank("name", doc.name)?;
        let password = require_non_blank("password", doc.password)?;
        let mut user = find_by_name(stores, &name).await?;

        if !deps.hasher.verify(&password, &user.password)? {
            tracing::warn!(user_id = %user.id, "Login refused: incorrect password");
            return Err(CoreError::Unauthorized("Incorrect password".into()));
        }
        if !user.active {
            return Err(CoreError::Forbidden(format!("User {name} is not active")));
        }

        user.token = Some(deps.tokens.token());
        let user = stores.users().save(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    pub async fn send_reset_password_mail<S: Stores>(
        stores: &S,
        deps: &AccountDeps,
        doc: UserDocument,
    ) -> CoreResult<()> {
        let email = doc.email.unwrap_or_default();
        validate_email(&email)?;
        let mut user = stores
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| CoreError::not_found("User", email.as_str()))?;

        user.reset_password_token = Some(deps.tokens.token());
        user.reset_time = Some(deps.clock.now());
        let user = stores.users().save(&user).await?;
        tracing::info!(user_id = %user.id, "Password reset requested");

        deps.mailer.send_reset_password_mail(&user).await
    }

    /// Set a new password using a reset token that is still within its
    /// lifetime. The token is single-use.
    pub async fn reset_password<S: Stores>(
        stores: &S,
        deps: &AccountDeps,
        doc: UserDocument,
    ) -> CoreResult<()> {
        let name = require_non_blank("name", doc.name)?;
        let token = require_non_blank("resetPasswordToken", doc.reset_password_token)?;
        let password = require_non_blank("password", doc.password)?;

        let mut user = stores
            .users()
            .find_by_name_and_reset_token(&name, &token)
            .await?
            .ok_or_else(|| CoreError::not_found("User", name.as_str()))?;

        let now = deps.clock.now();
        let expired = user
            .reset_time
            .is_none_or(|issued| now - issued > deps.reset_token_lifetime);
        if expired {
            tracing::warn!(user_id = %user.id, "Password reset refused: token expired");
            return Err(CoreError::Unauthorized("Reset token expired".into()));
        }

        user.password = deps.hasher.hash(&password)?;
        user.reset_password_token = None;
        user.reset_time = None;
        stores.users().save(&user).await?;
        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Select a task for the user owning `token`. The task's project becomes
    /// the selected project.
    pub async fn patch<S: Stores>(stores: &S, token: &str, op: &PatchOperation) -> CoreResult<User> {
        let mut user = Self::get_by_token(stores, token).await?;
        validate_patch(&user, op)?;

        let task_id = op.value.as_deref().unwrap_or_default();
        let task: Task = engine::fetch(stores.tasks(), task_id).await?;

        user.selected_task = Some(task.id);
        user.selected_project = Some(task.project_id);
        let user = stores.users().save(&user).await?;
        tracing::info!(user_id = %user.id, task_id, "Task selected");
        Ok(user)
    }

    /// Delete the user and their sessions.
    pub async fn delete<S: Stores>(stores: &S, id: &str) -> CoreResult<()> {
        engine::delete_user(stores, id).await
    }
}

async fn find_by_name<S: Stores>(stores: &S, name: &str) -> CoreResult<User> {
    stores
        .users()
        .find_by_name(name)
        .await?
        .ok_or_else(|| CoreError::not_found("User", name))
}
