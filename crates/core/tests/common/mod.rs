//! Shared fixtures for the service tests: fake account collaborators and
//! entity builders over the in-memory store.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use timekeeper_core::accounts::{AccountDeps, Clock, Mailer, PasswordHasher, TokenSource};
use timekeeper_core::error::{CoreError, CoreResult};
use timekeeper_core::memory::MemoryStores;
use timekeeper_core::models::{Project, ProjectDocument, Task, TaskDocument, User};
use timekeeper_core::services::{ProjectService, TaskService};

/// Reversible "hash" so tests can assert what was stored.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> CoreResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> CoreResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Activation { to: String, token: String },
    ResetPassword { to: String, token: String },
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_activation_mail(&self, user: &User) -> CoreResult<()> {
        let token = user
            .activation_token
            .clone()
            .ok_or_else(|| CoreError::Internal("no activation token".into()))?;
        self.sent.lock().unwrap().push(SentMail::Activation {
            to: user.email.clone(),
            token,
        });
        Ok(())
    }

    async fn send_reset_password_mail(&self, user: &User) -> CoreResult<()> {
        let token = user
            .reset_password_token
            .clone()
            .ok_or_else(|| CoreError::Internal("no reset token".into()))?;
        self.sent.lock().unwrap().push(SentMail::ResetPassword {
            to: user.email.clone(),
            token,
        });
        Ok(())
    }
}

/// Hands out `token-1`, `token-2`, ...
#[derive(Default)]
pub struct SequenceTokens(AtomicUsize);

impl TokenSource for SequenceTokens {
    fn token(&self) -> String {
        format!("token-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// A clock tests can move by hand.
pub struct ManualClock(Mutex<NaiveDateTime>);

impl ManualClock {
    pub fn at(raw: &str) -> Self {
        Self(Mutex::new(ts(raw)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

pub struct Accounts {
    pub deps: AccountDeps,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<ManualClock>,
}

pub fn accounts() -> Accounts {
    let mailer = Arc::new(RecordingMailer::default());
    let clock = Arc::new(ManualClock::at("2024-03-01T09:00:00"));
    let mut deps = AccountDeps::new(Arc::new(PlainHasher), mailer.clone());
    deps.tokens = Arc::new(SequenceTokens::default());
    deps.clock = clock.clone();
    Accounts {
        deps,
        mailer,
        clock,
    }
}

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").unwrap()
}

pub async fn seed_project(stores: &MemoryStores, status: Option<&str>) -> Project {
    ProjectService::add(
        stores,
        ProjectDocument {
            name: Some("project".into()),
            description: Some("Hello".into()),
            status: status.map(str::to_string),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_task(stores: &MemoryStores, project_id: &str) -> Task {
    TaskService::add(
        stores,
        TaskDocument {
            name: Some("name".into()),
            description: Some(String::new()),
            project_id: Some(project_id.into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}
