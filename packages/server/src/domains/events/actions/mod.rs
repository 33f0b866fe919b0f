pub mod attendance;
pub mod manage;
pub mod reminders;
pub mod report;

pub use attendance::*;
pub use manage::*;
pub use reminders::*;
