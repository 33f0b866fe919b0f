use juniper::GraphQLObject;

use crate::common::Tier;
use crate::domains::members::MemberData;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A basher's position on the leaderboard")]
pub struct LeaderboardEntryData {
    /// Competition rank: tied bashers share a rank and the next rank skips
    pub rank: i32,
    pub member: MemberData,
    pub tier: Tier,
    pub clan_name: Option<String>,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A clan's position on the clan leaderboard")]
pub struct ClanLeaderboardEntryData {
    pub rank: i32,
    pub clan_id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub member_count: i32,
    pub total_points: i32,
    pub average_points: f64,
}
