//! Auth domain - GitHub sign-in and session tokens

pub mod actions;
pub mod data;
pub mod jwt;

pub use data::AuthPayload;
pub use jwt::{Claims, JwtService};
