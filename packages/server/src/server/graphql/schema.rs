//! GraphQL schema definition.
//!
//! Resolvers stay thin: parse arguments, resolve the caller, call the
//! domain action and convert its model into API data.

use super::context::GraphQLContext;
use juniper::{EmptySubscription, FieldError, FieldResult, RootNode};
use tracing::{error, info};

use crate::common::{AuthError, PaginationArgs, ValidationError};

// Domain actions
use crate::domains::achievements::actions as achievement_actions;
use crate::domains::auth::actions as auth_actions;
use crate::domains::clans::actions as clan_actions;
use crate::domains::events::actions as event_actions;
use crate::domains::leaderboard::actions as leaderboard_actions;
use crate::domains::members::actions as member_actions;
use crate::domains::notifications::actions as notification_actions;
use crate::domains::profiles::actions as profile_actions;

// Domain data types (GraphQL types)
use crate::domains::achievements::data::{
    AchievementData, AchievementInput, AwardAchievementResult, UnlockedAchievementData,
};
use crate::domains::auth::AuthPayload;
use crate::domains::clans::data::{ClanData, ClanInput};
use crate::domains::events::data::{
    AttendanceReportData, EventData, EventInput, MarkAttendanceResult, MemberAttendanceData,
};
use crate::domains::leaderboard::{ClanLeaderboardEntryData, LeaderboardEntryData};
use crate::domains::members::data::{
    CreateMemberInput, MemberConnection, MemberData, PointsAwardResult, PointsEntryData,
    UpdateMemberInput, UpdateProfileInput,
};
use crate::domains::notifications::data::{
    BroadcastResult, NotificationConnection, NotificationData, PushSubscriptionData,
};
use crate::domains::profiles::ProfileData;

/// Auth and validation failures are the caller's mistake; anything else is ours.
fn is_internal(e: &anyhow::Error) -> bool {
    e.downcast_ref::<AuthError>().is_none() && e.downcast_ref::<ValidationError>().is_none()
}

fn to_field_error(e: anyhow::Error) -> FieldError {
    if is_internal(&e) {
        error!("{:#}", e);
    }
    FieldError::new(e.to_string(), juniper::Value::null())
}

fn pagination(
    first: Option<i32>,
    after: Option<String>,
    last: Option<i32>,
    before: Option<String>,
) -> FieldResult<crate::common::ValidatedPaginationArgs> {
    PaginationArgs {
        first,
        after,
        last,
        before,
    }
    .validate()
    .map_err(|e| FieldError::new(e, juniper::Value::null()))
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Member Queries
    // =========================================================================

    /// The signed-in basher
    async fn me(ctx: &GraphQLContext) -> FieldResult<Option<MemberData>> {
        let user = ctx.require_auth()?;
        let member = member_actions::get_member(&user.member_id.to_string(), ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.map(MemberData::from))
    }

    async fn member(ctx: &GraphQLContext, id: String) -> FieldResult<Option<MemberData>> {
        let member = member_actions::get_member(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.map(MemberData::from))
    }

    /// Case-insensitive GitHub login lookup
    async fn member_by_github(
        ctx: &GraphQLContext,
        username: String,
    ) -> FieldResult<Option<MemberData>> {
        let member = member_actions::get_member_by_github(&username, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.map(MemberData::from))
    }

    /// Bashers as a Relay connection, in join order
    ///
    /// Arguments:
    /// - first: Return first N items (forward pagination)
    /// - after: Return items after this cursor (forward pagination)
    /// - last: Return last N items (backward pagination)
    /// - before: Return items before this cursor (backward pagination)
    async fn members(
        ctx: &GraphQLContext,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<MemberConnection> {
        let validated = pagination(first, after, last, before)?;

        member_actions::get_members_paginated(&validated, ctx.deps())
            .await
            .map_err(|e| {
                error!("Failed to get paginated members: {}", e);
                FieldError::new("Failed to get members", juniper::Value::null())
            })
    }

    /// Most recent points changes for a basher, newest first
    async fn points_history(
        ctx: &GraphQLContext,
        member_id: String,
        limit: Option<i32>,
    ) -> FieldResult<Vec<PointsEntryData>> {
        let entries = member_actions::get_points_history(&member_id, limit, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(entries.into_iter().map(PointsEntryData::from).collect())
    }

    // =========================================================================
    // Clan Queries
    // =========================================================================

    async fn clans(ctx: &GraphQLContext) -> FieldResult<Vec<ClanData>> {
        let clans = clan_actions::get_clans(ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(clans.into_iter().map(ClanData::from).collect())
    }

    async fn clan(ctx: &GraphQLContext, id: String) -> FieldResult<Option<ClanData>> {
        let clan = clan_actions::get_clan(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(clan.map(ClanData::from))
    }

    // =========================================================================
    // Leaderboard Queries
    // =========================================================================

    /// Bashers ranked by Bash Points. Search narrows the list without
    /// changing anyone's rank.
    async fn leaderboard(
        ctx: &GraphQLContext,
        clan_id: Option<String>,
        search: Option<String>,
        limit: Option<i32>,
    ) -> FieldResult<Vec<LeaderboardEntryData>> {
        leaderboard_actions::get_leaderboard(clan_id, search, limit, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn clan_leaderboard(ctx: &GraphQLContext) -> FieldResult<Vec<ClanLeaderboardEntryData>> {
        leaderboard_actions::get_clan_leaderboard(ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn member_rank(
        ctx: &GraphQLContext,
        member_id: String,
    ) -> FieldResult<Option<LeaderboardEntryData>> {
        leaderboard_actions::get_member_rank(&member_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    // =========================================================================
    // Event Queries
    // =========================================================================

    /// `upcoming: true` lists events not yet over, `false` past ones
    async fn events(ctx: &GraphQLContext, upcoming: Option<bool>) -> FieldResult<Vec<EventData>> {
        let events = event_actions::get_events(upcoming, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(events.into_iter().map(EventData::from).collect())
    }

    async fn event(ctx: &GraphQLContext, id: String) -> FieldResult<Option<EventData>> {
        let event = event_actions::get_event(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(event.map(EventData::from))
    }

    async fn event_attendance(
        ctx: &GraphQLContext,
        event_id: String,
    ) -> FieldResult<AttendanceReportData> {
        event_actions::get_event_attendance(&event_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn member_attendance(
        ctx: &GraphQLContext,
        member_id: String,
    ) -> FieldResult<MemberAttendanceData> {
        event_actions::get_member_attendance(&member_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    // =========================================================================
    // Achievement Queries
    // =========================================================================

    async fn achievements(ctx: &GraphQLContext) -> FieldResult<Vec<AchievementData>> {
        let achievements = achievement_actions::get_achievements(ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(achievements.into_iter().map(AchievementData::from).collect())
    }

    async fn member_achievements(
        ctx: &GraphQLContext,
        member_id: String,
    ) -> FieldResult<Vec<UnlockedAchievementData>> {
        let unlocked = achievement_actions::get_member_achievements(&member_id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(unlocked
            .into_iter()
            .map(UnlockedAchievementData::from)
            .collect())
    }

    // =========================================================================
    // Notification Queries
    // =========================================================================

    /// The caller's inbox, newest first
    async fn my_notifications(
        ctx: &GraphQLContext,
        unread_only: Option<bool>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<NotificationConnection> {
        let user = ctx.require_auth()?;
        let validated = pagination(first, after, last, before)?;

        notification_actions::get_my_notifications(
            user.member_id,
            unread_only.unwrap_or(false),
            &validated,
            ctx.deps(),
        )
        .await
        .map_err(|e| {
            error!("Failed to get notifications: {}", e);
            FieldError::new("Failed to get notifications", juniper::Value::null())
        })
    }

    async fn unread_notification_count(ctx: &GraphQLContext) -> FieldResult<i32> {
        let user = ctx.require_auth()?;
        notification_actions::get_unread_count(user.member_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    /// Public VAPID key for `PushManager.subscribe`, `null` when push is off
    fn vapid_public_key(ctx: &GraphQLContext) -> Option<String> {
        notification_actions::get_vapid_public_key(ctx.deps())
    }

    // =========================================================================
    // Profile Queries
    // =========================================================================

    /// Full profile page. Platform sections are `null` when the platform is
    /// unreachable or the basher has no account there.
    async fn profile(
        ctx: &GraphQLContext,
        github_username: String,
    ) -> FieldResult<Option<ProfileData>> {
        profile_actions::get_profile(&github_username, ctx.deps())
            .await
            .map_err(to_field_error)
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Auth Mutations
    // =========================================================================

    /// Exchange a GitHub OAuth code for a session token
    async fn login_with_github(ctx: &GraphQLContext, code: String) -> FieldResult<AuthPayload> {
        let (token, member) = auth_actions::login_with_github(code, ctx.deps())
            .await
            .map_err(|e| {
                error!("GitHub login failed: {}", e);
                FieldError::new("GitHub login failed", juniper::Value::null())
            })?;

        let is_organiser = auth_actions::is_organiser(&member, ctx.deps());
        Ok(AuthPayload {
            token,
            member: member.into(),
            is_organiser,
        })
    }

    // =========================================================================
    // Member Mutations
    // =========================================================================

    async fn create_member(
        ctx: &GraphQLContext,
        input: CreateMemberInput,
    ) -> FieldResult<MemberData> {
        let member = member_actions::create_member(ctx.actor()?, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.into())
    }

    /// Edit the caller's profile, or anyone's when an organiser passes `memberId`
    async fn update_profile(
        ctx: &GraphQLContext,
        input: UpdateProfileInput,
        member_id: Option<String>,
    ) -> FieldResult<MemberData> {
        let member =
            member_actions::update_profile(ctx.actor()?, member_id.as_deref(), input, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(member.into())
    }

    async fn update_member(
        ctx: &GraphQLContext,
        id: String,
        input: UpdateMemberInput,
    ) -> FieldResult<MemberData> {
        let member = member_actions::update_member(ctx.actor()?, &id, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.into())
    }

    async fn delete_member(ctx: &GraphQLContext, id: String) -> FieldResult<bool> {
        member_actions::delete_member(ctx.actor()?, &id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    /// Award (positive) or deduct (negative) Bash Points
    async fn award_points(
        ctx: &GraphQLContext,
        member_id: String,
        points: i32,
        reason: String,
    ) -> FieldResult<PointsAwardResult> {
        let change = member_actions::award_points(ctx.actor()?, &member_id, points, reason, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(change.into())
    }

    // =========================================================================
    // Clan Mutations
    // =========================================================================

    async fn create_clan(ctx: &GraphQLContext, input: ClanInput) -> FieldResult<ClanData> {
        let clan = clan_actions::create_clan(ctx.actor()?, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(clan.into())
    }

    async fn update_clan(
        ctx: &GraphQLContext,
        id: String,
        input: ClanInput,
    ) -> FieldResult<ClanData> {
        let clan = clan_actions::update_clan(ctx.actor()?, &id, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(clan.into())
    }

    /// Members of a deleted clan become clanless
    async fn delete_clan(ctx: &GraphQLContext, id: String) -> FieldResult<bool> {
        clan_actions::delete_clan(ctx.actor()?, &id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    /// Move a basher into a clan, or out of any clan with `clanId: null`
    async fn assign_clan(
        ctx: &GraphQLContext,
        member_id: String,
        clan_id: Option<String>,
    ) -> FieldResult<MemberData> {
        let member = clan_actions::assign_clan(ctx.actor()?, &member_id, clan_id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(member.into())
    }

    // =========================================================================
    // Event Mutations
    // =========================================================================

    async fn create_event(ctx: &GraphQLContext, input: EventInput) -> FieldResult<EventData> {
        let event = event_actions::create_event(ctx.actor()?, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(event.into())
    }

    async fn update_event(
        ctx: &GraphQLContext,
        id: String,
        input: EventInput,
    ) -> FieldResult<EventData> {
        let event = event_actions::update_event(ctx.actor()?, &id, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(event.into())
    }

    async fn delete_event(ctx: &GraphQLContext, id: String) -> FieldResult<bool> {
        event_actions::delete_event(ctx.actor()?, &id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    /// Mark bashers present. Already-marked bashers are skipped.
    async fn mark_attendance(
        ctx: &GraphQLContext,
        event_id: String,
        member_ids: Vec<String>,
    ) -> FieldResult<MarkAttendanceResult> {
        info!(event_id = %event_id, count = member_ids.len(), "markAttendance");
        event_actions::mark_attendance(ctx.actor()?, &event_id, member_ids, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn unmark_attendance(
        ctx: &GraphQLContext,
        event_id: String,
        member_id: String,
    ) -> FieldResult<bool> {
        event_actions::unmark_attendance(ctx.actor()?, &event_id, &member_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    // =========================================================================
    // Achievement Mutations
    // =========================================================================

    async fn create_achievement(
        ctx: &GraphQLContext,
        input: AchievementInput,
    ) -> FieldResult<AchievementData> {
        let achievement = achievement_actions::create_achievement(ctx.actor()?, input, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(achievement.into())
    }

    async fn delete_achievement(ctx: &GraphQLContext, id: String) -> FieldResult<bool> {
        achievement_actions::delete_achievement(ctx.actor()?, &id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn award_achievement(
        ctx: &GraphQLContext,
        member_id: String,
        achievement_id: String,
    ) -> FieldResult<AwardAchievementResult> {
        achievement_actions::award_achievement(
            ctx.actor()?,
            &member_id,
            &achievement_id,
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)
    }

    async fn revoke_achievement(
        ctx: &GraphQLContext,
        member_id: String,
        achievement_id: String,
    ) -> FieldResult<bool> {
        achievement_actions::revoke_achievement(
            ctx.actor()?,
            &member_id,
            &achievement_id,
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)
    }

    // =========================================================================
    // Notification Mutations
    // =========================================================================

    async fn mark_notification_read(
        ctx: &GraphQLContext,
        id: String,
    ) -> FieldResult<NotificationData> {
        let user = ctx.require_auth()?;
        let notification =
            notification_actions::mark_notification_read(user.member_id, &id, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(notification.into())
    }

    /// Returns how many notifications changed
    async fn mark_all_notifications_read(ctx: &GraphQLContext) -> FieldResult<i32> {
        let user = ctx.require_auth()?;
        notification_actions::mark_all_notifications_read(user.member_id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn delete_notification(ctx: &GraphQLContext, id: String) -> FieldResult<bool> {
        let user = ctx.require_auth()?;
        notification_actions::delete_notification(user.member_id, &id, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn broadcast_notification(
        ctx: &GraphQLContext,
        title: String,
        body: String,
        link: Option<String>,
    ) -> FieldResult<BroadcastResult> {
        let summary =
            notification_actions::broadcast_notification(ctx.actor()?, title, body, link, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(summary.into())
    }

    /// Register this browser for push. An endpoint already registered to
    /// someone else moves to the caller.
    async fn subscribe_push(
        ctx: &GraphQLContext,
        endpoint: String,
        p256dh: String,
        auth: String,
    ) -> FieldResult<PushSubscriptionData> {
        let user = ctx.require_auth()?;
        let subscription =
            notification_actions::subscribe_push(user.member_id, endpoint, p256dh, auth, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(subscription.into())
    }

    async fn unsubscribe_push(ctx: &GraphQLContext, endpoint: String) -> FieldResult<bool> {
        let user = ctx.require_auth()?;
        notification_actions::unsubscribe_push(user.member_id, &endpoint, ctx.deps())
            .await
            .map_err(to_field_error)
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
