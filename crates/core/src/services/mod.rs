//! Entity services.
//!
//! Each service is a stateless set of operations generic over a [`Stores`]
//! bundle. A service fetches current state first (so missing entities fail
//! with `NotFound` before anything is validated), validates, writes, and then
//! fires whatever cascade the operation implies.
//!
//! [`Stores`]: crate::store::Stores

pub mod project;
pub mod session;
pub mod task;
pub mod user;

pub use project::ProjectService;
pub use session::SessionService;
pub use task::TaskService;
pub use user::UserService;
