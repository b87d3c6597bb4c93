//! Integration tests for the PostgreSQL stores.
//!
//! Need a Postgres `DATABASE_URL`; run with `cargo test -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use timekeeper_core::error::CoreError;
use timekeeper_core::fields::{field, FieldValue, PROJECT_FIELDS, TASK_FIELDS};
use timekeeper_core::models::{NewProject, NewSession, NewTask, NewUser};
use timekeeper_core::patch::PatchOperation;
use timekeeper_core::services::{ProjectService, TaskService};
use timekeeper_core::status::{Priority, ProjectStatus, TaskStatus};
use timekeeper_core::store::{ChildStore, EntityStore, SessionStore, Stores, UserStore};
use timekeeper_db::PgStores;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: None,
        dead_line: None,
        status: None,
    }
}

fn new_task(project_id: &str) -> NewTask {
    NewTask {
        name: "task".to_string(),
        description: Some(String::new()),
        project_id: project_id.to_string(),
        current_time: None,
        priority: Priority::Medium,
        status: TaskStatus::ReadyToStart,
    }
}

fn new_session(task_id: &str, user_id: Option<&str>) -> NewSession {
    NewSession {
        task_id: task_id.to_string(),
        user_id: user_id.map(str::to_string),
        start_time: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        end_time: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_health_check(pool: PgPool) {
    timekeeper_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_project_round_trip(pool: PgPool) {
    let stores = PgStores::new(pool);
    let created = stores.projects().insert(new_project("alpha")).await.unwrap();

    let found = stores.projects().find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.status, None);
    assert!(stores.projects().find_by_id("missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_update_field_writes_one_column(pool: PgPool) {
    let stores = PgStores::new(pool);
    let project = stores.projects().insert(new_project("alpha")).await.unwrap();
    let status = field(PROJECT_FIELDS, "status").unwrap();

    let acked = stores
        .projects()
        .update_field(&project.id, status, &FieldValue::ProjectStatus(ProjectStatus::Done))
        .await
        .unwrap();
    assert!(acked);

    let stored = stores.projects().find_by_id(&project.id).await.unwrap().unwrap();
    assert_eq!(stored.status, Some(ProjectStatus::Done));
    assert_eq!(stored.name, "alpha");

    let acked = stores
        .projects()
        .update_field("missing", status, &FieldValue::ProjectStatus(ProjectStatus::Done))
        .await
        .unwrap();
    assert!(!acked);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_task_timestamp_column(pool: PgPool) {
    let stores = PgStores::new(pool);
    let project = stores.projects().insert(new_project("alpha")).await.unwrap();
    let task = stores.tasks().insert(new_task(&project.id)).await.unwrap();

    let patched = TaskService::patch(
        &stores,
        &task.id,
        &PatchOperation::replace("/currentTime", "2018-07-24T11:18:58"),
    )
    .await
    .unwrap();
    let stored = stores.tasks().find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.current_time, patched.current_time);

    let priority = field(TASK_FIELDS, "priority").unwrap();
    stores
        .tasks()
        .update_field(&task.id, priority, &FieldValue::Priority(Priority::VeryHigh))
        .await
        .unwrap();
    let stored = stores.tasks().find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, Priority::VeryHigh);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_project_delete_cascades(pool: PgPool) {
    let stores = PgStores::new(pool);
    let project = stores.projects().insert(new_project("alpha")).await.unwrap();
    let task = stores.tasks().insert(new_task(&project.id)).await.unwrap();
    stores.sessions().insert(new_session(&task.id, None)).await.unwrap();

    ProjectService::delete(&stores, &project.id).await.unwrap();

    assert!(stores.projects().find_all().await.unwrap().is_empty());
    assert!(stores.tasks().find_all_by_parent_id(&project.id).await.unwrap().is_empty());
    assert!(stores.sessions().find_all_by_parent_id(&task.id).await.unwrap().is_empty());
    assert_matches!(
        ProjectService::get_by_id(&stores, &project.id).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_user_lookups(pool: PgPool) {
    let stores = PgStores::new(pool);
    let mut user = stores
        .users()
        .insert(NewUser {
            name: "jane".into(),
            email: "jane@example.com".into(),
            password: "hash".into(),
            activation_token: "activation".into(),
        })
        .await
        .unwrap();
    assert!(!user.active);

    user.token = Some("session".into());
    user.reset_password_token = Some("reset".into());
    stores.users().save(&user).await.unwrap();

    let users = stores.users();
    assert_eq!(users.find_by_name("jane").await.unwrap().unwrap().id, user.id);
    assert_eq!(users.find_by_email("jane@example.com").await.unwrap().unwrap().id, user.id);
    assert_eq!(users.find_by_token("session").await.unwrap().unwrap().id, user.id);
    assert!(users.find_by_name_and_reset_token("jane", "reset").await.unwrap().is_some());
    assert!(users.find_by_name_and_reset_token("jane", "other").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_sessions_by_user(pool: PgPool) {
    let stores = PgStores::new(pool);
    let project = stores.projects().insert(new_project("alpha")).await.unwrap();
    let task = stores.tasks().insert(new_task(&project.id)).await.unwrap();
    stores.sessions().insert(new_session(&task.id, Some("u1"))).await.unwrap();
    stores.sessions().insert(new_session(&task.id, Some("u1"))).await.unwrap();
    stores.sessions().insert(new_session(&task.id, Some("u2"))).await.unwrap();

    assert_eq!(stores.sessions().find_all_by_user_id("u1").await.unwrap().len(), 2);
    assert_eq!(stores.sessions().delete_all_by_user_id("u1").await.unwrap(), 2);
    assert_eq!(stores.sessions().find_all().await.unwrap().len(), 1);
}
