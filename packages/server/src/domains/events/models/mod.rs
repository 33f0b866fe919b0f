pub mod attendance;
pub mod event;

pub use attendance::{Attendance, AttendanceTally};
pub use event::{Event, EventFields};
