use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::common::utils::tiers::points_to_next_tier;
use crate::common::{PageInfo, Tier};
use crate::domains::members::models::{Member, MemberRole, PointsEntry};

/// Public API representation of a basher
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A Byte Bash Blitz club member")]
pub struct MemberData {
    pub id: String,
    pub github_username: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub title: Option<String>,
    pub role: MemberRole,
    pub bash_points: i32,
    pub tier: Tier,
    /// `null` once the basher has reached the top tier
    pub points_to_next_tier: Option<i32>,
    pub clan_id: Option<String>,
    pub leetcode_username: Option<String>,
    pub duolingo_username: Option<String>,
    pub discord_username: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl From<Member> for MemberData {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            tier: Tier::from_points(member.bash_points),
            points_to_next_tier: points_to_next_tier(member.bash_points),
            github_username: member.github_username,
            name: member.name,
            avatar_url: member.avatar_url,
            bio: member.bio,
            title: member.title,
            role: member.role,
            bash_points: member.bash_points,
            clan_id: member.clan_id.map(|id| id.to_string()),
            leetcode_username: member.leetcode_username,
            duolingo_username: member.duolingo_username,
            discord_username: member.discord_username,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct MemberEdge {
    pub node: MemberData,
    pub cursor: String,
}

/// Relay connection over bashers in join order
#[derive(Debug, Clone, GraphQLObject)]
pub struct MemberConnection {
    pub edges: Vec<MemberEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A Bash Points award or deduction")]
pub struct PointsEntryData {
    pub id: String,
    pub points: i32,
    pub reason: String,
    pub awarded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PointsEntry> for PointsEntryData {
    fn from(entry: PointsEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            points: entry.points,
            reason: entry.reason,
            awarded_by: entry.awarded_by.map(|id| id.to_string()),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateMemberInput {
    pub github_username: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub title: Option<String>,
    pub role: Option<MemberRole>,
    pub clan_id: Option<String>,
    pub leetcode_username: Option<String>,
    pub duolingo_username: Option<String>,
    pub discord_username: Option<String>,
}

/// Omitted fields keep their value; an empty string clears an optional field.
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub title: Option<String>,
    pub leetcode_username: Option<String>,
    pub duolingo_username: Option<String>,
    pub discord_username: Option<String>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct UpdateMemberInput {
    pub github_username: Option<String>,
    pub role: Option<MemberRole>,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Result of a Bash Points award")]
pub struct PointsAwardResult {
    pub member: MemberData,
    pub entry: PointsEntryData,
    pub previous_tier: Tier,
    pub promoted: bool,
}
