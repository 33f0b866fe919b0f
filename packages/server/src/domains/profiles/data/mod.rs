use chrono::{DateTime, NaiveDate, Utc};
use juniper::GraphQLObject;

use crate::common::utils::{calendar_from_timestamps, compute_streak, StreakSummary};
use crate::common::Tier;
use crate::domains::achievements::data::UnlockedAchievementData;
use crate::domains::clans::ClanData;
use crate::domains::events::data::MemberAttendanceData;
use crate::domains::members::MemberData;
use crate::kernel::platforms::{DiscordProfile, DuolingoStats, GithubUser, LeetCodeStats};
use crate::server::graphql::context::GraphQLContext;

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct GithubStatsData {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub profile_url: String,
    pub bio: Option<String>,
    pub public_repos: i32,
    pub followers: i32,
    pub following: i32,
    pub created_at: DateTime<Utc>,
}

impl From<GithubUser> for GithubStatsData {
    fn from(user: GithubUser) -> Self {
        Self {
            login: user.login,
            name: user.name,
            avatar_url: user.avatar_url,
            profile_url: user.html_url,
            bio: user.bio,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(description = "Consecutive days with at least one submission")]
pub struct StreakData {
    pub current: i32,
    pub longest: i32,
    pub active_days: i32,
    pub total_submissions: i32,
}

impl From<StreakSummary> for StreakData {
    fn from(summary: StreakSummary) -> Self {
        Self {
            current: summary.current,
            longest: summary.longest,
            active_days: summary.active_days,
            total_submissions: clamp_i32(summary.total),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct LeetCodeStatsData {
    pub username: String,
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
    pub ranking: Option<i32>,
    pub acceptance_rate: Option<f64>,
    pub streak: StreakData,
}

impl LeetCodeStatsData {
    pub fn new(username: String, stats: LeetCodeStats, today: NaiveDate) -> Self {
        let calendar = calendar_from_timestamps(&stats.submission_calendar);
        Self {
            username,
            total_solved: stats.total_solved,
            easy_solved: stats.easy_solved,
            medium_solved: stats.medium_solved,
            hard_solved: stats.hard_solved,
            ranking: stats.ranking,
            acceptance_rate: stats.acceptance_rate,
            streak: StreakData::from(compute_streak(&calendar, today)),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct DuolingoCourseData {
    pub title: String,
    pub xp: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct DuolingoStatsData {
    pub username: String,
    pub streak: i32,
    pub total_xp: i32,
    pub courses: Vec<DuolingoCourseData>,
}

impl DuolingoStatsData {
    pub fn new(username: String, stats: DuolingoStats) -> Self {
        Self {
            username,
            streak: stats.streak,
            total_xp: clamp_i32(stats.total_xp),
            courses: stats
                .courses
                .into_iter()
                .map(|course| DuolingoCourseData {
                    title: course.title,
                    xp: clamp_i32(course.xp),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct DiscordStatsData {
    pub username: String,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    /// When the basher joined the club server
    pub joined_at: Option<DateTime<Utc>>,
}

impl From<DiscordProfile> for DiscordStatsData {
    fn from(profile: DiscordProfile) -> Self {
        Self {
            username: profile.username,
            display_name: profile.display_name,
            nickname: profile.nickname,
            avatar_url: profile.avatar_url,
            joined_at: profile.joined_at,
        }
    }
}

/// Everything shown on a basher's profile page. Platform sections are
/// `null` when the basher has no account linked or the platform is down.
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct ProfileData {
    pub member: MemberData,
    pub clan: Option<ClanData>,
    pub tier: Tier,
    pub points_to_next_tier: Option<i32>,
    pub rank: Option<i32>,
    pub achievements: Vec<UnlockedAchievementData>,
    pub attendance: MemberAttendanceData,
    pub github: Option<GithubStatsData>,
    pub leetcode: Option<LeetCodeStatsData>,
    pub duolingo: Option<DuolingoStatsData>,
    pub discord: Option<DiscordStatsData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn leetcode_section_derives_streak() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2026, 3, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp()
                .to_string()
        };

        let mut calendar = HashMap::new();
        calendar.insert(day(8), 2);
        calendar.insert(day(9), 1);
        calendar.insert(day(10), 4);

        let stats = LeetCodeStats {
            total_solved: 120,
            easy_solved: 60,
            medium_solved: 50,
            hard_solved: 10,
            ranking: Some(150_000),
            acceptance_rate: Some(61.5),
            submission_calendar: calendar,
        };

        let section = LeetCodeStatsData::new("ada".into(), stats, today);
        assert_eq!(
            section.streak,
            StreakData {
                current: 3,
                longest: 3,
                active_days: 3,
                total_submissions: 7,
            }
        );
    }

    #[test]
    fn huge_xp_saturates() {
        assert_eq!(clamp_i32(i64::MAX), i32::MAX);
        assert_eq!(clamp_i32(42), 42);
    }
}
