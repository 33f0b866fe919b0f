//! Inbox, broadcast and browser push delivery.

mod common;

use crate::common::{create_basher, create_organiser, subscribe, TestHarness};
use blitz_core::domains::members::Member;
use blitz_core::domains::notifications::{
    Notification, NotificationContent, NotificationKind, PushSubscription,
};
use blitz_core::common::NotificationId;
use blitz_core::domains::notifications::actions::{delete_read_older_than, READ_RETENTION_DAYS};
use blitz_core::kernel::test_dependencies::{MockPushNotificationService, TestDependencies};
use chrono::{Duration, Utc};
use test_context::test_context;

async fn seed_inbox(ctx: &TestHarness, member: &Member, count: usize) -> Vec<Notification> {
    let mut created = Vec::new();
    for i in 1..=count {
        let content = NotificationContent::new(
            NotificationKind::General,
            format!("Notice {}", i),
            "Read me",
        );
        created.push(Notification::create(member.id, &content, &ctx.db_pool).await.unwrap());
    }
    created
}

#[test_context(TestHarness)]
#[tokio::test]
async fn inbox_pages_newest_first(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    seed_inbox(ctx, &basher, 5).await;
    let client = ctx.graphql_as(&basher);

    let page = client
        .query("{ myNotifications(first: 2) { totalCount unreadCount edges { node { title read } } pageInfo { hasNextPage endCursor } } }")
        .await;
    let inbox = &page["myNotifications"];
    assert_eq!(inbox["totalCount"], 5);
    assert_eq!(inbox["unreadCount"], 5);
    assert_eq!(inbox["edges"][0]["node"]["title"], "Notice 5");
    assert_eq!(inbox["edges"][1]["node"]["title"], "Notice 4");
    assert_eq!(inbox["edges"][0]["node"]["read"], false);
    assert_eq!(inbox["pageInfo"]["hasNextPage"], true);

    let cursor = inbox["pageInfo"]["endCursor"].as_str().unwrap().to_string();
    let next = client
        .query(&format!(
            r#"{{ myNotifications(first: 10, after: "{}") {{ edges {{ node {{ title }} }} pageInfo {{ hasNextPage }} }} }}"#,
            cursor
        ))
        .await;
    let titles: Vec<&str> = next["myNotifications"]["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["node"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Notice 3", "Notice 2", "Notice 1"]);
    assert_eq!(next["myNotifications"]["pageInfo"]["hasNextPage"], false);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bashers_only_read_their_own_notifications(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let other = create_basher(&ctx.db_pool, "hubot", 0).await.unwrap();
    let mine = seed_inbox(ctx, &basher, 2).await;
    let theirs = seed_inbox(ctx, &other, 1).await;
    let client = ctx.graphql_as(&basher);

    let read = client
        .query(&format!(
            r#"mutation {{ markNotificationRead(id: "{}") {{ read readAt }} }}"#,
            mine[0].id
        ))
        .await;
    assert_eq!(read["markNotificationRead"]["read"], true);

    let denied = client
        .execute(&format!(
            r#"mutation {{ markNotificationRead(id: "{}") {{ read }} }}"#,
            theirs[0].id
        ))
        .await;
    assert!(denied.has_error("Notification not found"));

    let deleted = client
        .query(&format!(r#"mutation {{ deleteNotification(id: "{}") }}"#, theirs[0].id))
        .await;
    assert_eq!(deleted["deleteNotification"], false);

    let unread = client.query("{ unreadNotificationCount }").await;
    assert_eq!(unread["unreadNotificationCount"], 1);

    let unread_only = client
        .query("{ myNotifications(unreadOnly: true) { totalCount edges { node { title } } } }")
        .await;
    assert_eq!(unread_only["myNotifications"]["totalCount"], 1);
    assert_eq!(
        unread_only["myNotifications"]["edges"][0]["node"]["title"],
        "Notice 2"
    );

    let all = client.query("mutation { markAllNotificationsRead }").await;
    assert_eq!(all["markAllNotificationsRead"], 1);

    let still_unread = Notification::count_unread(other.id, &ctx.db_pool).await.unwrap();
    assert_eq!(still_unread, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn broadcast_reaches_every_basher(ctx: &TestHarness) {
    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let alice = create_basher(&ctx.db_pool, "alice", 0).await.unwrap();
    create_basher(&ctx.db_pool, "bob", 0).await.unwrap();
    subscribe(&ctx.db_pool, alice.id, "https://push.example/alice")
        .await
        .unwrap();

    let data = ctx
        .graphql_as(&organiser)
        .query(
            r#"mutation { broadcastNotification(title: "Lab closed", body: "No meetup this week", link: "/events") { recipients pushDelivered } }"#,
        )
        .await;

    assert_eq!(data["broadcastNotification"]["recipients"], 3);
    assert_eq!(data["broadcastNotification"]["pushDelivered"], 1);

    let sent = ctx.push.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "https://push.example/alice");
    assert_eq!(sent[0].1.title, "Lab closed");
    assert_eq!(sent[0].1.url.as_deref(), Some("/events"));
}

#[tokio::test]
async fn gone_endpoints_are_removed_and_failures_ignored() {
    let push = MockPushNotificationService::new()
        .with_gone_endpoint("https://push.example/stale")
        .with_failing_endpoint("https://push.example/flaky");
    let ctx = TestHarness::with_dependencies(TestDependencies::new().mock_push(push))
        .await
        .unwrap();

    let organiser = create_organiser(&ctx.db_pool, "mona").await.unwrap();
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    for endpoint in [
        "https://push.example/stale",
        "https://push.example/flaky",
        "https://push.example/laptop",
    ] {
        subscribe(&ctx.db_pool, basher.id, endpoint).await.unwrap();
    }

    let result = ctx
        .graphql_as(&organiser)
        .execute(&format!(
            r#"mutation {{ awardPoints(memberId: "{}", points: 5, reason: "Fixed the build") {{ member {{ bashPoints }} }} }}"#,
            basher.id
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("awardPoints.member.bashPoints"), 5);

    let remaining: Vec<String> = PushSubscription::find_by_member(basher.id, &ctx.db_pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.endpoint)
        .collect();
    assert_eq!(remaining.len(), 2);
    assert!(!remaining.contains(&"https://push.example/stale".to_string()));

    assert_eq!(ctx.push.sent().len(), 1);
    assert_eq!(ctx.push.sent()[0].0, "https://push.example/laptop");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn push_subscriptions_move_between_bashers(ctx: &TestHarness) {
    let alice = create_basher(&ctx.db_pool, "alice", 0).await.unwrap();
    let bob = create_basher(&ctx.db_pool, "bob", 0).await.unwrap();
    let subscribe_mutation = r#"mutation { subscribePush(endpoint: "https://push.example/shared", p256dh: "key", auth: "secret") { endpoint } }"#;

    ctx.graphql_as(&alice).query(subscribe_mutation).await;
    ctx.graphql_as(&bob).query(subscribe_mutation).await;

    assert!(PushSubscription::find_by_member(alice.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        PushSubscription::find_by_member(bob.id, &ctx.db_pool)
            .await
            .unwrap()
            .len(),
        1
    );

    let insecure = ctx
        .graphql_as(&alice)
        .execute(r#"mutation { subscribePush(endpoint: "http://push.example/x", p256dh: "k", auth: "s") { endpoint } }"#)
        .await;
    assert!(insecure.has_error("https"));

    let key = ctx.graphql().query("{ vapidPublicKey }").await;
    assert_eq!(key["vapidPublicKey"], "test-vapid-public-key");
}

async fn backdate(
    ctx: &TestHarness,
    id: NotificationId,
    created_days_ago: i64,
    read_days_ago: Option<i64>,
) {
    let now = Utc::now();
    sqlx::query("UPDATE notifications SET created_at = $2, read_at = $3 WHERE id = $1")
        .bind(id)
        .bind(now - Duration::days(created_days_ago))
        .bind(read_days_ago.map(|days| now - Duration::days(days)))
        .execute(&ctx.db_pool)
        .await
        .unwrap();
}

#[test_context(TestHarness)]
#[tokio::test]
async fn prune_only_removes_old_read_notifications(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 0).await.unwrap();
    let seeded = seed_inbox(ctx, &basher, 3).await;
    let (old_read, recent_read, old_unread) = (seeded[0].id, seeded[1].id, seeded[2].id);

    backdate(ctx, old_read, 45, Some(40)).await;
    backdate(ctx, recent_read, 2, Some(1)).await;
    backdate(ctx, old_unread, 45, None).await;

    let removed = delete_read_older_than(READ_RETENTION_DAYS, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining: Vec<NotificationId> =
        sqlx::query_scalar("SELECT id FROM notifications ORDER BY created_at")
            .fetch_all(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(!remaining.contains(&old_read));
    assert!(remaining.contains(&recent_read));
    assert!(remaining.contains(&old_unread));
}
