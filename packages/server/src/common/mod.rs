// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;
pub mod utils;

pub use auth::{Actor, AuthError, Capability, HasAuthContext};
pub use entity_ids::*;
pub use errors::{optional_text, require_text, ValidationError};
pub use pagination::{
    build_page_info, trim_results, Cursor, PageInfo, PaginationArgs, ValidatedPaginationArgs,
};
pub use utils::Tier;
