//! Outgoing account mail.
//!
//! - [`mail`] -- SMTP delivery via `lettre`, or a logging fallback when SMTP
//!   is not configured.

pub mod mail;
