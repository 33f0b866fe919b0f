use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::domains::achievements::models::{Achievement, AchievementWithCount, UnlockedAchievement};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A badge bashers can unlock")]
pub struct AchievementData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub points: i32,
    /// How many bashers hold it; null where not computed
    pub unlock_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Achievement> for AchievementData {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id.to_string(),
            name: achievement.name,
            description: achievement.description,
            icon: achievement.icon,
            points: achievement.points,
            unlock_count: None,
            created_at: achievement.created_at,
        }
    }
}

impl From<AchievementWithCount> for AchievementData {
    fn from(row: AchievementWithCount) -> Self {
        Self {
            unlock_count: Some(row.unlock_count),
            ..Self::from(row.achievement)
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct UnlockedAchievementData {
    pub achievement: AchievementData,
    pub unlocked_at: DateTime<Utc>,
}

impl From<UnlockedAchievement> for UnlockedAchievementData {
    fn from(row: UnlockedAchievement) -> Self {
        Self {
            achievement: AchievementData::from(row.achievement),
            unlocked_at: row.unlocked_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AwardAchievementResult {
    pub achievement: AchievementData,
    pub unlocked_at: DateTime<Utc>,
    /// False when the basher already held the achievement
    pub newly_unlocked: bool,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct AchievementInput {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    /// Bonus points on unlock, defaults to 0
    pub points: Option<i32>,
}
