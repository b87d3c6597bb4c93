//! Shared helpers for the HTTP integration tests.
//!
//! The app is built over the in-memory store with the same router and
//! middleware stack as production. Mails are captured instead of sent.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use timekeeper_api::config::ServerConfig;
use timekeeper_api::router::build_app_router;
use timekeeper_api::state::AppState;
use timekeeper_core::accounts::{AccountDeps, Mailer, PasswordHasher};
use timekeeper_core::error::CoreResult;
use timekeeper_core::memory::MemoryStores;
use timekeeper_core::models::User;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        reset_token_lifetime_mins: 10,
    }
}

/// Fast stand-in for Argon2 so account tests stay quick.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> CoreResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> CoreResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Keeps the last activation and reset tokens mailed to each address.
#[derive(Default)]
pub struct CapturingMailer {
    activation: Mutex<Vec<(String, String)>>,
    reset: Mutex<Vec<(String, String)>>,
}

impl CapturingMailer {
    pub fn activation_token(&self, email: &str) -> Option<String> {
        last_for(&self.activation, email)
    }

    pub fn reset_token(&self, email: &str) -> Option<String> {
        last_for(&self.reset, email)
    }
}

fn last_for(sent: &Mutex<Vec<(String, String)>>, email: &str) -> Option<String> {
    sent.lock()
        .unwrap()
        .iter()
        .rev()
        .find(|(to, _)| to == email)
        .map(|(_, token)| token.clone())
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_activation_mail(&self, user: &User) -> CoreResult<()> {
        if let Some(token) = &user.activation_token {
            self.activation
                .lock()
                .unwrap()
                .push((user.email.clone(), token.clone()));
        }
        Ok(())
    }

    async fn send_reset_password_mail(&self, user: &User) -> CoreResult<()> {
        if let Some(token) = &user.reset_password_token {
            self.reset
                .lock()
                .unwrap()
                .push((user.email.clone(), token.clone()));
        }
        Ok(())
    }
}

/// Router plus handles on the state behind it.
pub struct TestApp {
    pub router: Router,
    pub stores: Arc<MemoryStores>,
    pub mailer: Arc<CapturingMailer>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let stores = Arc::new(MemoryStores::new());
    let mailer = Arc::new(CapturingMailer::default());

    let state = AppState {
        stores: Arc::clone(&stores),
        accounts: AccountDeps::new(Arc::new(PlainHasher), mailer.clone()),
        config: Arc::new(config.clone()),
        pool: None,
    };

    TestApp {
        router: build_app_router(state, &config),
        stores,
        mailer,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

/// `{ "op": "replace", "path": "/<field>", "value": <value> }`
pub fn replace(field: &str, value: &str) -> Value {
    serde_json::json!({ "op": "replace", "path": format!("/{field}"), "value": value })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project and return its id.
pub async fn create_project(app: &TestApp, name: &str) -> String {
    let response = post_json(app.app(), "/api/v1/projects", serde_json::json!({ "name": name })).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_str().unwrap().to_string()
}

/// Create a task in `project_id` and return its id.
pub async fn create_task(app: &TestApp, project_id: &str, name: &str) -> String {
    let response = post_json(
        app.app(),
        "/api/v1/tasks",
        serde_json::json!({ "name": name, "projectId": project_id }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_str().unwrap().to_string()
}

/// Register, activate and log in `name`; returns `(user_id, session_token)`.
pub async fn signed_in_user(app: &TestApp, name: &str) -> (String, String) {
    let email = format!("{name}@example.com");
    let response = post_json(
        app.app(),
        "/api/v1/user/register",
        serde_json::json!({ "name": name, "email": email, "password": "secret" }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let token = app.mailer.activation_token(&email).unwrap();
    let response = post_json(
        app.app(),
        "/api/v1/user/activate",
        serde_json::json!({ "name": name, "activationToken": token }),
    )
    .await;
    assert_eq!(response.status(), 200);

    let response = post_json(
        app.app(),
        "/api/v1/user/login",
        serde_json::json!({ "name": name, "password": "secret" }),
    )
    .await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    (
        json["data"]["id"].as_str().unwrap().to_string(),
        json["data"]["token"].as_str().unwrap().to_string(),
    )
}
