//! Domain entities and their wire documents.
//!
//! Each submodule contains:
//! - The persisted entity (`Serialize`), always carrying a store-assigned id
//! - A `New*` draft: a validated entity that has not been inserted yet
//! - A `*Document` (`Deserialize`): the raw client payload, enums and dates as
//!   strings, turned into a draft or entity by the validator

pub mod project;
pub mod session;
pub mod task;
pub mod user;

pub use project::{NewProject, Project, ProjectDocument};
pub use session::{NewSession, Session, SessionDocument};
pub use task::{NewTask, Task, TaskDocument};
pub use user::{NewUser, User, UserDocument};

use crate::error::{CoreError, CoreResult};
use crate::fields::{FieldSpec, FieldValue};
use crate::types::EntityId;

/// A persisted document type managed by an [`EntityStore`](crate::store::EntityStore).
pub trait Entity: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs.
    const NAME: &'static str;

    /// Validated, not yet persisted form accepted by `insert`.
    type Draft: Send + Sync + 'static;

    fn id(&self) -> &str;

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    /// Write one converted value into the matching field.
    fn set_field(&mut self, field: &FieldSpec, value: FieldValue) -> CoreResult<()>;
}

/// An entity owned by a parent (task -> project, session -> task).
pub trait ChildEntity: Entity {
    fn parent_id(&self) -> &str;
}

fn field_mismatch(entity: &'static str, field: &FieldSpec, value: &FieldValue) -> CoreError {
    CoreError::Internal(format!(
        "{entity} field '{}' cannot hold {value:?}",
        field.name
    ))
}
