//! Account flow tests: register, activate, login, password reset, task
//! selection and user deletion.

mod common;

use assert_matches::assert_matches;

use common::{accounts, seed_project, seed_task, Accounts, ManualClock, SentMail};
use timekeeper_core::error::CoreError;
use timekeeper_core::memory::MemoryStores;
use timekeeper_core::models::{SessionDocument, User, UserDocument};
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::{SessionService, UserService};

fn registration(name: &str, email: &str) -> UserDocument {
    UserDocument {
        name: Some(name.into()),
        email: Some(email.into()),
        password: Some("secret".into()),
        ..Default::default()
    }
}

fn credentials(name: &str, password: &str) -> UserDocument {
    UserDocument {
        name: Some(name.into()),
        password: Some(password.into()),
        ..Default::default()
    }
}

async fn active_user(stores: &MemoryStores, acc: &Accounts, name: &str) -> User {
    let user = UserService::register(stores, &acc.deps, registration(name, &format!("{name}@example.com")))
        .await
        .unwrap();
    UserService::activate(
        stores,
        UserDocument {
            name: Some(name.into()),
            activation_token: user.activation_token.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    UserService::login(stores, &acc.deps, credentials(name, "secret"))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Register / activate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_creates_inactive_user_and_mails_token() {
    let stores = MemoryStores::new();
    let acc = accounts();

    let user = UserService::register(&stores, &acc.deps, registration("jane", "jane@example.com"))
        .await
        .unwrap();

    assert!(!user.active);
    assert_eq!(user.password, "hashed:secret");
    assert_eq!(user.activation_token.as_deref(), Some("token-1"));
    assert_eq!(
        acc.mailer.sent(),
        vec![SentMail::Activation {
            to: "jane@example.com".into(),
            token: "token-1".into()
        }]
    );
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let err = UserService::register(&stores, &acc.deps, registration("jane", "jane@example"))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::BadRequest(_));
    assert!(acc.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_register_rejects_taken_name_or_email() {
    let stores = MemoryStores::new();
    let acc = accounts();
    UserService::register(&stores, &acc.deps, registration("jane", "jane@example.com"))
        .await
        .unwrap();

    for doc in [
        registration("jane", "other@example.com"),
        registration("john", "jane@example.com"),
    ] {
        let err = UserService::register(&stores, &acc.deps, doc).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }
}

#[tokio::test]
async fn test_activate_checks_token_then_state() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let user = UserService::register(&stores, &acc.deps, registration("jane", "jane@example.com"))
        .await
        .unwrap();

    let wrong = UserDocument {
        name: Some("jane".into()),
        activation_token: Some("nope".into()),
        ..Default::default()
    };
    assert_matches!(
        UserService::activate(&stores, wrong).await,
        Err(CoreError::BadRequest(_))
    );

    let right = UserDocument {
        name: Some("jane".into()),
        activation_token: user.activation_token.clone(),
        ..Default::default()
    };
    assert!(UserService::activate(&stores, right.clone()).await.unwrap().active);
    assert_matches!(
        UserService::activate(&stores, right).await,
        Err(CoreError::Conflict(_))
    );
}

#[tokio::test]
async fn test_activate_unknown_user_is_not_found() {
    let stores = MemoryStores::new();
    let doc = UserDocument {
        name: Some("ghost".into()),
        activation_token: Some("t".into()),
        ..Default::default()
    };
    assert_matches!(
        UserService::activate(&stores, doc).await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_issues_session_token() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let user = active_user(&stores, &acc, "jane").await;

    let token = user.token.clone().unwrap();
    assert!(UserService::is_authenticated(&stores, &token).await.unwrap());
    assert_eq!(UserService::get_by_token(&stores, &token).await.unwrap().id, user.id);
}

#[tokio::test]
async fn test_login_failures() {
    let stores = MemoryStores::new();
    let acc = accounts();
    UserService::register(&stores, &acc.deps, registration("jane", "jane@example.com"))
        .await
        .unwrap();

    assert_matches!(
        UserService::login(&stores, &acc.deps, credentials("jane", "")).await,
        Err(CoreError::BadRequest(_))
    );
    assert_matches!(
        UserService::login(&stores, &acc.deps, credentials("ghost", "secret")).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        UserService::login(&stores, &acc.deps, credentials("jane", "wrong")).await,
        Err(CoreError::Unauthorized(_))
    );
    assert_matches!(
        UserService::login(&stores, &acc.deps, credentials("jane", "secret")).await,
        Err(CoreError::Forbidden(_))
    );
}

#[tokio::test]
async fn test_unknown_token_is_not_authenticated() {
    let stores = MemoryStores::new();
    assert!(!UserService::is_authenticated(&stores, "nope").await.unwrap());
    assert!(!UserService::is_authenticated(&stores, "").await.unwrap());
    assert_matches!(
        UserService::get_by_token(&stores, "nope").await,
        Err(CoreError::Unauthorized(_))
    );
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

async fn request_reset(stores: &MemoryStores, acc: &Accounts) -> String {
    UserService::send_reset_password_mail(
        stores,
        &acc.deps,
        UserDocument {
            email: Some("jane@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    match acc.mailer.sent().last() {
        Some(SentMail::ResetPassword { token, .. }) => token.clone(),
        other => panic!("expected a reset mail, got {other:?}"),
    }
}

fn reset(token: &str, password: &str) -> UserDocument {
    UserDocument {
        name: Some("jane".into()),
        reset_password_token: Some(token.into()),
        password: Some(password.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reset_password_within_lifetime() {
    let stores = MemoryStores::new();
    let acc = accounts();
    active_user(&stores, &acc, "jane").await;
    let token = request_reset(&stores, &acc).await;

    acc.clock.advance(chrono::Duration::minutes(9));
    UserService::reset_password(&stores, &acc.deps, reset(&token, "fresh"))
        .await
        .unwrap();

    assert!(UserService::login(&stores, &acc.deps, credentials("jane", "fresh")).await.is_ok());
    // Single use.
    assert_matches!(
        UserService::reset_password(&stores, &acc.deps, reset(&token, "again")).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn test_expired_reset_token_is_unauthorized() {
    let stores = MemoryStores::new();
    let acc = accounts();
    active_user(&stores, &acc, "jane").await;
    let token = request_reset(&stores, &acc).await;

    acc.clock.advance(chrono::Duration::minutes(11));
    assert_matches!(
        UserService::reset_password(&stores, &acc.deps, reset(&token, "fresh")).await,
        Err(CoreError::Unauthorized(_))
    );
    assert!(UserService::login(&stores, &acc.deps, credentials("jane", "secret")).await.is_ok());
}

#[tokio::test]
async fn test_reset_mail_for_unknown_email_is_not_found() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let doc = UserDocument {
        email: Some("ghost@example.com".into()),
        ..Default::default()
    };
    assert_matches!(
        UserService::send_reset_password_mail(&stores, &acc.deps, doc).await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Selection and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_select_task_sets_project_too() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let user = active_user(&stores, &acc, "jane").await;
    let project = seed_project(&stores, None).await;
    let task = seed_task(&stores, &project.id).await;
    let token = user.token.unwrap();

    let patched = UserService::patch(&stores, &token, &PatchOperation::replace("/selectedTask", &task.id))
        .await
        .unwrap();
    assert_eq!(patched.selected_task.as_deref(), Some(task.id.as_str()));
    assert_eq!(patched.selected_project.as_deref(), Some(project.id.as_str()));

    assert_matches!(
        UserService::patch(&stores, &token, &PatchOperation::replace("/selectedTask", "missing")).await,
        Err(CoreError::NotFound { entity: "Task", .. })
    );
    assert_matches!(
        UserService::patch(&stores, &token, &PatchOperation::replace("/selectedProject", &project.id)).await,
        Err(CoreError::BadRequest(_))
    );
    assert_matches!(
        UserService::patch(&stores, "nope", &PatchOperation::replace("/selectedTask", &task.id)).await,
        Err(CoreError::Unauthorized(_))
    );
}

#[tokio::test]
async fn test_delete_user_cascades_to_own_sessions() {
    let stores = MemoryStores::new();
    let acc = accounts();
    let jane = active_user(&stores, &acc, "jane").await;
    let john = active_user(&stores, &acc, "john").await;
    let project = seed_project(&stores, None).await;
    let task = seed_task(&stores, &project.id).await;
    let clock = ManualClock::at("2024-03-01T09:00:00");

    for user_id in [&jane.id, &jane.id, &john.id] {
        SessionService::add(
            &stores,
            &clock,
            SessionDocument {
                task_id: Some(task.id.clone()),
                user_id: Some(user_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    UserService::delete(&stores, &jane.id).await.unwrap();

    assert_matches!(
        UserService::get_by_id(&stores, &jane.id).await,
        Err(CoreError::NotFound { .. })
    );
    assert!(SessionService::get_all_by_user(&stores, &jane.id).await.unwrap().is_empty());
    assert_eq!(SessionService::get_all_by_user(&stores, &john.id).await.unwrap().len(), 1);
}
