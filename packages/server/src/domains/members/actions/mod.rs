pub mod manage;
pub mod points;
pub mod queries;

pub use manage::*;
pub use points::*;
pub use queries::*;
