//! Authorization checks for resolvers and actions.
//!
//! ```rust,ignore
//! use crate::common::auth::{Actor, Capability};
//!
//! Actor::new(actor_id, is_organiser)
//!     .can(Capability::ManageEvents)
//!     .check()?;
//! ```

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder, HasAuthContext};
pub use capability::Capability;
pub use errors::AuthError;
