pub mod notification;
pub mod push_subscription;

pub use notification::{Notification, NotificationContent, NotificationKind};
pub use push_subscription::PushSubscription;
