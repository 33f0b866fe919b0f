//! Leaderboards for bashers and clans.
//!
//! Ranks are computed over the whole population being ranked, so a search
//! narrows what is returned without changing anyone's rank.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::info;

use crate::common::utils::{competition_ranks, round2};
use crate::common::{ClanId, MemberId, Tier};
use crate::domains::clans::{Clan, ClanStanding};
use crate::domains::leaderboard::data::{ClanLeaderboardEntryData, LeaderboardEntryData};
use crate::domains::members::{Member, MemberData};
use crate::kernel::ServerDeps;

const DEFAULT_LIMIT: i32 = 100;
const MAX_LIMIT: i32 = 500;

/// Members must already be sorted by points descending.
pub fn rank_members(members: Vec<Member>) -> Vec<(i32, Member)> {
    let points: Vec<i32> = members.iter().map(|m| m.bash_points).collect();
    competition_ranks(&points).into_iter().zip(members).collect()
}

fn matches_search(member: &Member, needle: &str) -> bool {
    member.name.to_lowercase().contains(needle)
        || member.github_username.to_lowercase().contains(needle)
}

/// Standings must already be sorted by total points descending.
pub fn rank_clans(standings: Vec<ClanStanding>) -> Vec<ClanLeaderboardEntryData> {
    let totals: Vec<i32> = standings.iter().map(|s| s.total_points).collect();
    competition_ranks(&totals)
        .into_iter()
        .zip(standings)
        .map(|(rank, standing)| ClanLeaderboardEntryData {
            rank,
            clan_id: standing.id.to_string(),
            average_points: if standing.member_count > 0 {
                round2(f64::from(standing.total_points) / f64::from(standing.member_count))
            } else {
                0.0
            },
            name: standing.name,
            logo_url: standing.logo_url,
            member_count: standing.member_count,
            total_points: standing.total_points,
        })
        .collect()
}

async fn clan_names(deps: &ServerDeps) -> Result<HashMap<ClanId, String>> {
    Ok(Clan::find_all(&deps.db_pool)
        .await?
        .into_iter()
        .map(|clan| (clan.id, clan.name))
        .collect())
}

fn entry(rank: i32, member: Member, clans: &HashMap<ClanId, String>) -> LeaderboardEntryData {
    let clan_name = member.clan_id.and_then(|id| clans.get(&id).cloned());
    LeaderboardEntryData {
        rank,
        tier: Tier::from_points(member.bash_points),
        clan_name,
        member: MemberData::from(member),
    }
}

/// Ranked bashers, optionally within one clan and filtered by name.
pub async fn get_leaderboard(
    clan_id: Option<String>,
    search: Option<String>,
    limit: Option<i32>,
    deps: &ServerDeps,
) -> Result<Vec<LeaderboardEntryData>> {
    info!(clan_id = ?clan_id, search = ?search, "Getting leaderboard");

    let members = match clan_id.as_deref() {
        Some(raw) => {
            let clan_id = ClanId::parse(raw).context("Invalid clan id")?;
            Member::find_by_clan(clan_id, &deps.db_pool).await?
        }
        None => Member::find_all_by_points(&deps.db_pool).await?,
    };
    let clans = clan_names(deps).await?;

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize;

    Ok(rank_members(members)
        .into_iter()
        .filter(|(_, member)| needle.as_deref().map_or(true, |n| matches_search(member, n)))
        .take(limit)
        .map(|(rank, member)| entry(rank, member, &clans))
        .collect())
}

pub async fn get_clan_leaderboard(deps: &ServerDeps) -> Result<Vec<ClanLeaderboardEntryData>> {
    info!("Getting clan leaderboard");
    Ok(rank_clans(Clan::standings(&deps.db_pool).await?))
}

/// Overall rank of one basher
pub async fn get_member_rank(
    member_id: &str,
    deps: &ServerDeps,
) -> Result<Option<LeaderboardEntryData>> {
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    member_rank(member_id, deps).await
}

pub(crate) async fn member_rank(
    member_id: MemberId,
    deps: &ServerDeps,
) -> Result<Option<LeaderboardEntryData>> {
    let members = Member::find_all_by_points(&deps.db_pool).await?;
    let clans = clan_names(deps).await?;

    Ok(rank_members(members)
        .into_iter()
        .find(|(_, member)| member.id == member_id)
        .map(|(rank, member)| entry(rank, member, &clans)))
}
