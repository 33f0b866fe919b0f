pub mod broadcast;
pub mod dispatch;
pub mod inbox;
pub mod maintenance;
pub mod push;
pub mod queries;

pub use broadcast::*;
pub use dispatch::{notify_member, notify_members, DeliverySummary};
pub use inbox::*;
pub use maintenance::*;
pub use push::*;
pub use queries::*;
