//! Profile aggregation. External platforms are fetched concurrently and a
//! failing or unconfigured platform only blanks its own section.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::common::utils::points_to_next_tier;
use crate::common::Tier;
use crate::domains::achievements::data::UnlockedAchievementData;
use crate::domains::achievements::MemberAchievement;
use crate::domains::clans::{Clan, ClanData};
use crate::domains::events::actions::member_attendance;
use crate::domains::leaderboard::actions::member_rank;
use crate::domains::members::{Member, MemberData};
use crate::domains::profiles::data::{
    DiscordStatsData, DuolingoStatsData, GithubStatsData, LeetCodeStatsData, ProfileData,
};
use crate::kernel::ServerDeps;

async fn github_section(member: &Member, deps: &ServerDeps) -> Option<GithubStatsData> {
    match deps.github.fetch_user(&member.github_username).await {
        Ok(user) => Some(GithubStatsData::from(user)),
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "GitHub stats unavailable");
            None
        }
    }
}

async fn leetcode_section(member: &Member, deps: &ServerDeps) -> Option<LeetCodeStatsData> {
    let username = member.leetcode_username.as_deref()?;
    match deps.leetcode.fetch_stats(username).await {
        Ok(stats) => Some(LeetCodeStatsData::new(
            username.to_string(),
            stats,
            Utc::now().date_naive(),
        )),
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "LeetCode stats unavailable");
            None
        }
    }
}

async fn duolingo_section(member: &Member, deps: &ServerDeps) -> Option<DuolingoStatsData> {
    let username = member.duolingo_username.as_deref()?;
    match deps.duolingo.fetch_stats(username).await {
        Ok(stats) => Some(DuolingoStatsData::new(username.to_string(), stats)),
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "Duolingo stats unavailable");
            None
        }
    }
}

async fn discord_section(member: &Member, deps: &ServerDeps) -> Option<DiscordStatsData> {
    let username = member.discord_username.as_deref()?;
    let discord = deps.discord.as_ref()?;
    match discord.fetch_member(username).await {
        Ok(profile) => profile.map(DiscordStatsData::from),
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "Discord stats unavailable");
            None
        }
    }
}

/// `None` when no basher has this GitHub login.
pub async fn get_profile(github_username: &str, deps: &ServerDeps) -> Result<Option<ProfileData>> {
    let Some(member) = Member::find_by_github_username(github_username, &deps.db_pool).await? else {
        return Ok(None);
    };
    info!(member_id = %member.id, github = %member.github_username, "Building profile");

    let (github, leetcode, duolingo, discord) = tokio::join!(
        github_section(&member, deps),
        leetcode_section(&member, deps),
        duolingo_section(&member, deps),
        discord_section(&member, deps),
    );

    let clan = match member.clan_id {
        Some(clan_id) => Clan::find_by_id_optional(clan_id, &deps.db_pool)
            .await?
            .map(ClanData::from),
        None => None,
    };
    let rank = member_rank(member.id, deps).await?.map(|entry| entry.rank);
    let achievements = MemberAchievement::find_for_member(member.id, &deps.db_pool)
        .await?
        .into_iter()
        .map(UnlockedAchievementData::from)
        .collect();
    let attendance = member_attendance(&member, deps).await?;

    Ok(Some(ProfileData {
        tier: Tier::from_points(member.bash_points),
        points_to_next_tier: points_to_next_tier(member.bash_points),
        rank,
        clan,
        achievements,
        attendance,
        github,
        leetcode,
        duolingo,
        discord,
        member: MemberData::from(member),
    }))
}
