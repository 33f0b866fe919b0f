//! Achievements domain

pub mod actions;
pub mod data;
pub mod models;

pub use data::AchievementData;
pub use models::{Achievement, MemberAchievement};
