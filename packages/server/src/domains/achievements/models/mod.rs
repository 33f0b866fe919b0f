pub mod achievement;
pub mod member_achievement;

pub use achievement::{Achievement, AchievementWithCount};
pub use member_achievement::{MemberAchievement, UnlockedAchievement};
