//! Typed id aliases for every table with a primary key.

pub use super::id::Id;

pub struct Member;
pub struct Clan;
pub struct Event;
pub struct Achievement;
pub struct Notification;
pub struct PushSubscription;
pub struct PointsEntry;

pub type MemberId = Id<Member>;
pub type ClanId = Id<Clan>;
pub type EventId = Id<Event>;
pub type AchievementId = Id<Achievement>;
pub type NotificationId = Id<Notification>;
pub type PushSubscriptionId = Id<PushSubscription>;
pub type PointsEntryId = Id<PointsEntry>;
