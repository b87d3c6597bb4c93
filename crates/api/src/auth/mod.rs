//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing behind the core `PasswordHasher`.

pub mod password;
