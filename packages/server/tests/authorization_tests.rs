//! Who may call which mutation.

mod common;

use crate::common::{create_basher, create_clan, create_organiser, TestHarness};
use blitz_core::domains::members::Member;
use blitz_core::kernel::test_dependencies::TestDependencies;
use test_context::test_context;

fn award_mutation(member: &Member) -> String {
    format!(
        r#"mutation {{ awardPoints(memberId: "{}", points: 10, reason: "Helped at the help desk") {{ member {{ bashPoints }} }} }}"#,
        member.id
    )
}

#[test_context(TestHarness)]
#[tokio::test]
async fn anonymous_callers_cannot_mutate(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();

    let result = ctx.graphql().execute(&award_mutation(&basher)).await;
    assert!(result.has_error("Authentication required"));

    let result = ctx.graphql().execute("{ myNotifications { totalCount } }").await;
    assert!(result.has_error("Authentication required"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bashers_cannot_award_points(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let friend = create_basher(&ctx.db_pool, "hubot", 0).await.unwrap();

    let result = ctx
        .graphql_as(&basher)
        .execute(&award_mutation(&friend))
        .await;
    assert!(result.has_error("Organiser access required"));

    let unchanged = Member::find_by_id(friend.id, &ctx.db_pool).await.unwrap();
    assert_eq!(unchanged.bash_points, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bashers_cannot_manage_clans(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let clan = create_clan(&ctx.db_pool, "Alpha").await.unwrap();
    let client = ctx.graphql_as(&basher);

    let create = client
        .execute(r#"mutation { createClan(input: { name: "Rogues" }) { id } }"#)
        .await;
    assert!(create.has_error("Organiser access required"));

    let assign = client
        .execute(&format!(
            r#"mutation {{ assignClan(memberId: "{}", clanId: "{}") {{ clanId }} }}"#,
            basher.id, clan.id
        ))
        .await;
    assert!(assign.has_error("Organiser access required"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn organiser_role_can_award(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();

    let result = ctx
        .graphql_as(&organiser)
        .execute(&award_mutation(&basher))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("awardPoints.member.bashPoints"), 10);
}

#[tokio::test]
async fn allow_listed_login_acts_as_organiser() {
    let ctx = TestHarness::with_dependencies(TestDependencies::new().organisers(&["Mona"]))
        .await
        .unwrap();
    let mona = create_basher(&ctx.db_pool, "mona", 0).await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();

    let result = ctx
        .graphql_as(&mona)
        .execute(&award_mutation(&basher))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);

    let result = ctx
        .graphql_as(&basher)
        .execute(&award_mutation(&mona))
        .await;
    assert!(result.has_error("Organiser access required"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bashers_edit_only_their_own_profile(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let other = create_basher(&ctx.db_pool, "hubot", 0).await.unwrap();
    let client = ctx.graphql_as(&basher);

    let own = client
        .execute(r#"mutation { updateProfile(input: { bio: "Rustacean" }) { bio } }"#)
        .await;
    assert!(own.is_ok(), "{:?}", own.errors);
    assert_eq!(own.get("updateProfile.bio"), "Rustacean");

    let theirs = client
        .execute(&format!(
            r#"mutation {{ updateProfile(memberId: "{}", input: {{ bio: "hacked" }}) {{ bio }} }}"#,
            other.id
        ))
        .await;
    assert!(theirs.has_error("Permission denied"));

    let untouched = Member::find_by_id(other.id, &ctx.db_pool).await.unwrap();
    assert_eq!(untouched.bio, None);
}
