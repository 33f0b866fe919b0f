//! Events domain - scheduling, attendance and reminders

pub mod actions;
pub mod data;
pub mod models;

pub use data::EventData;
pub use models::{Attendance, Event};
