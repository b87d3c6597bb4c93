//! Domain core of the time tracker: entities, field conversion and
//! validation, status machines, the patch engine and the entity services.
//!
//! Storage, password hashing, mail delivery and token generation are
//! collaborators behind the traits in [`store`] and [`accounts`].

pub mod accounts;
pub mod engine;
pub mod error;
pub mod fields;
pub mod memory;
pub mod models;
pub mod patch;
pub mod services;
pub mod status;
pub mod store;
pub mod types;
pub mod validation;
