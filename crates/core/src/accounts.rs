//! Collaborators used by the account flows: password hashing, mail delivery,
//! token generation and the clock.
//!
//! Randomness and time are injected so the flows can be driven with
//! deterministic tokens and instants.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, Timelike};
use rand::Rng;

use crate::error::CoreResult;
use crate::models::User;
use crate::types::Timestamp;

/// Length of generated activation, reset and session tokens.
pub const TOKEN_LENGTH: usize = 128;

/// How long a reset-password token stays usable.
pub const DEFAULT_RESET_TOKEN_LIFETIME_MINS: i64 = 10;

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> CoreResult<String>;

    /// Returns `Ok(false)` on mismatch; `Err` only for a malformed stored hash.
    fn verify(&self, password: &str, hash: &str) -> CoreResult<bool>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_activation_mail(&self, user: &User) -> CoreResult<()>;

    async fn send_reset_password_mail(&self, user: &User) -> CoreResult<()>;
}

pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Tokens of [`TOKEN_LENGTH`] lowercase ASCII letters from the thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn token(&self) -> String {
        let mut rng = rand::rng();
        (0..TOKEN_LENGTH)
            .map(|_| char::from(rng.random_range(b'a'..=b'z')))
            .collect()
    }
}

/// Local wall clock truncated to whole seconds, matching the wire precision.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Everything the user service needs besides the stores.
#[derive(Clone)]
pub struct AccountDeps {
    pub hasher: Arc<dyn PasswordHasher>,
    pub mailer: Arc<dyn Mailer>,
    pub tokens: Arc<dyn TokenSource>,
    pub clock: Arc<dyn Clock>,
    pub reset_token_lifetime: chrono::Duration,
}

impl AccountDeps {
    pub fn new(hasher: Arc<dyn PasswordHasher>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            hasher,
            mailer,
            tokens: Arc::new(RandomTokenSource),
            clock: Arc::new(SystemClock),
            reset_token_lifetime: chrono::Duration::minutes(DEFAULT_RESET_TOKEN_LIFETIME_MINS),
        }
    }
}
