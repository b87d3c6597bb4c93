//! Row types for the four tables and their conversion into core entities.
//!
//! Enum columns hold wire literals; a value that no longer parses is reported
//! as a storage failure rather than silently defaulted.

pub mod project;
pub mod session;
pub mod task;
pub mod user;

use timekeeper_core::error::{CoreError, CoreResult};
use timekeeper_core::status::NamedEnum;

fn decode_enum<T: NamedEnum>(table: &str, column: &str, raw: &str) -> CoreResult<T> {
    T::from_name(raw).ok_or_else(|| {
        CoreError::StorageFailure(format!("{table}.{column} holds unknown value '{raw}'"))
    })
}
