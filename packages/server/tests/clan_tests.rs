//! Clan management and membership.

mod common;

use crate::common::{create_basher, create_clan, create_organiser, join_clan, TestHarness};
use blitz_core::domains::members::Member;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn assigning_a_clan_notifies_the_basher(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 40).await.unwrap();
    let clan = create_clan(&ctx.db_pool, "Alpha").await.unwrap();
    let client = ctx.graphql_as(&organiser);

    let data = client
        .query(&format!(
            r#"mutation {{ assignClan(memberId: "{}", clanId: "{}") {{ clanId }} }}"#,
            basher.id, clan.id
        ))
        .await;
    assert_eq!(data["assignClan"]["clanId"], clan.id.to_string());

    let inbox = ctx
        .graphql_as(&basher)
        .query("{ myNotifications { edges { node { kind title } } } }")
        .await;
    assert_eq!(inbox["myNotifications"]["edges"][0]["node"]["kind"], "CLAN");
    assert_eq!(
        inbox["myNotifications"]["edges"][0]["node"]["title"],
        "You joined Alpha"
    );

    let clan_view = ctx
        .graphql()
        .query(&format!(
            r#"{{ clan(id: "{}") {{ name memberCount totalPoints members {{ githubUsername }} }} }}"#,
            clan.id
        ))
        .await;
    assert_eq!(clan_view["clan"]["memberCount"], 1);
    assert_eq!(clan_view["clan"]["totalPoints"], 40);
    assert_eq!(clan_view["clan"]["members"][0]["githubUsername"], "octo");

    let left = client
        .query(&format!(
            r#"mutation {{ assignClan(memberId: "{}", clanId: null) {{ clanId }} }}"#,
            basher.id
        ))
        .await;
    assert!(left["assignClan"]["clanId"].is_null());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_a_clan_leaves_members_clanless(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 40).await.unwrap();
    let clan = create_clan(&ctx.db_pool, "Alpha").await.unwrap();
    join_clan(&ctx.db_pool, basher.id, clan.id).await.unwrap();

    let data = ctx
        .graphql_as(&organiser)
        .query(&format!(r#"mutation {{ deleteClan(id: "{}") }}"#, clan.id))
        .await;
    assert_eq!(data["deleteClan"], true);

    let member = Member::find_by_id(basher.id, &ctx.db_pool).await.unwrap();
    assert_eq!(member.clan_id, None);
    assert_eq!(member.bash_points, 40);

    let clans = ctx.graphql().query("{ clans { name } }").await;
    assert!(clans["clans"].as_array().unwrap().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn clan_names_are_unique(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    create_clan(&ctx.db_pool, "Alpha").await.unwrap();
    let beta = create_clan(&ctx.db_pool, "Beta").await.unwrap();
    let client = ctx.graphql_as(&organiser);

    let create = client
        .execute(r#"mutation { createClan(input: { name: "Alpha" }) { id } }"#)
        .await;
    assert!(create.has_error("is already taken"));

    let rename = client
        .execute(&format!(
            r#"mutation {{ updateClan(id: "{}", input: {{ name: "Alpha" }}) {{ name }} }}"#,
            beta.id
        ))
        .await;
    assert!(rename.has_error("is already taken"));

    let ok = client
        .query(&format!(
            r#"mutation {{ updateClan(id: "{}", input: {{ name: "Beta Squad", description: "Night owls" }}) {{ name description }} }}"#,
            beta.id
        ))
        .await;
    assert_eq!(ok["updateClan"]["name"], "Beta Squad");
    assert_eq!(ok["updateClan"]["description"], "Night owls");
}
