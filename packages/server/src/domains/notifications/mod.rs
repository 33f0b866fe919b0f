//! Notifications domain - in-app inbox plus browser push

pub mod actions;
pub mod data;
pub mod models;

pub use data::NotificationData;
pub use models::{Notification, NotificationContent, NotificationKind, PushSubscription};
