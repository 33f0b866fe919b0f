//! Awarding Bash Points: ledger, tiers and notifications.

mod common;

use crate::common::{create_basher, create_organiser, subscribe, TestHarness};
use blitz_core::domains::members::models::PointsEntry;
use blitz_core::domains::members::Member;
use blitz_core::domains::notifications::models::Notification;
use blitz_core::domains::notifications::NotificationKind;
use test_context::test_context;

const AWARD: &str = r#"
    mutation Award($memberId: String!, $points: Int!, $reason: String!) {
        awardPoints(memberId: $memberId, points: $points, reason: $reason) {
            previousTier
            promoted
            member { bashPoints tier pointsToNextTier }
            entry { points reason awardedBy }
        }
    }
"#;

async fn kinds_for(ctx: &TestHarness, member: &Member) -> Vec<NotificationKind> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE member_id = $1 ORDER BY id",
    )
    .bind(member.id)
    .fetch_all(&ctx.db_pool)
    .await
    .unwrap()
    .into_iter()
    .map(|n| n.kind)
    .collect()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn award_crossing_a_threshold_promotes(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 240).await.unwrap();
    subscribe(&ctx.db_pool, basher.id, "https://push.example/octo")
        .await
        .unwrap();

    let data = ctx
        .graphql_as(&organiser)
        .query_with_vars(
            AWARD,
            vars! {
                "memberId" => basher.id.to_string(),
                "points" => 20,
                "reason" => "Won the lightning round",
            },
        )
        .await;

    let result = &data["awardPoints"];
    assert_eq!(result["member"]["bashPoints"], 260);
    assert_eq!(result["member"]["tier"], "SILVER");
    assert_eq!(result["member"]["pointsToNextTier"], 340);
    assert_eq!(result["previousTier"], "BRONZE");
    assert_eq!(result["promoted"], true);
    assert_eq!(result["entry"]["points"], 20);
    assert_eq!(result["entry"]["reason"], "Won the lightning round");
    assert_eq!(result["entry"]["awardedBy"], organiser.id.to_string());

    assert_eq!(
        kinds_for(ctx, &basher).await,
        vec![NotificationKind::Points, NotificationKind::Tier]
    );
    assert!(ctx.push.was_sent_with_title("You earned 20 Bash Points"));
    assert!(ctx.push.was_sent_with_title("Welcome to Silver!"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deduction_is_recorded_without_promotion(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 50).await.unwrap();

    let data = ctx
        .graphql_as(&organiser)
        .query_with_vars(
            AWARD,
            vars! {
                "memberId" => basher.id.to_string(),
                "points" => -80,
                "reason" => "Late submission",
            },
        )
        .await;

    assert_eq!(data["awardPoints"]["member"]["bashPoints"], -30);
    assert_eq!(data["awardPoints"]["member"]["tier"], "UNRANKED");
    assert_eq!(data["awardPoints"]["promoted"], false);

    let history = PointsEntry::find_by_member(basher.id, 10, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].points, -80);

    assert_eq!(kinds_for(ctx, &basher).await, vec![NotificationKind::Points]);
    let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM notifications WHERE member_id = $1")
        .bind(basher.id)
        .fetch_all(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(titles, vec!["80 Bash Points deducted".to_string()]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn zero_points_and_blank_reason_are_rejected(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let client = ctx.graphql_as(&organiser);

    let zero = client
        .execute_with_vars(
            AWARD,
            vars! { "memberId" => basher.id.to_string(), "points" => 0, "reason" => "nothing" },
        )
        .await;
    assert!(zero.has_error("must not be zero"));

    let blank = client
        .execute_with_vars(
            AWARD,
            vars! { "memberId" => basher.id.to_string(), "points" => 5, "reason" => "   " },
        )
        .await;
    assert!(blank.has_error("reason must not be empty"));

    let unchanged = Member::find_by_id(basher.id, &ctx.db_pool).await.unwrap();
    assert_eq!(unchanged.bash_points, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn points_history_is_newest_first(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let client = ctx.graphql_as(&organiser);

    for (points, reason) in [(10, "first"), (15, "second"), (-5, "third")] {
        client
            .query_with_vars(
                AWARD,
                vars! { "memberId" => basher.id.to_string(), "points" => points, "reason" => reason },
            )
            .await;
    }

    let data = ctx
        .graphql()
        .query(&format!(
            r#"{{ pointsHistory(memberId: "{}", limit: 2) {{ points reason }} }}"#,
            basher.id
        ))
        .await;

    let history = data["pointsHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["reason"], "third");
    assert_eq!(history[1]["reason"], "second");

    let member = Member::find_by_id(basher.id, &ctx.db_pool).await.unwrap();
    assert_eq!(member.bash_points, 20);
}
