//! GitHub sign-in and session tokens.

mod common;

use crate::common::{create_basher, TestHarness};
use blitz_core::domains::members::Member;
use blitz_core::kernel::test_dependencies::{MockGithubClient, TestDependencies};
use test_context::test_context;

const LOGIN: &str = r#"
    mutation Login($code: String!) {
        loginWithGithub(code: $code) {
            token
            isOrganiser
            member { id githubUsername name role bashPoints }
        }
    }
"#;

#[tokio::test]
async fn first_login_registers_the_basher() {
    let github = MockGithubClient::new().with_oauth_code("code-123", "octocat");
    let ctx = TestHarness::with_dependencies(TestDependencies::new().mock_github(github))
        .await
        .unwrap();

    let data = ctx
        .graphql()
        .query_with_vars(LOGIN, vars! { "code" => "code-123" })
        .await;
    let payload = &data["loginWithGithub"];

    assert_eq!(payload["member"]["githubUsername"], "octocat");
    assert_eq!(payload["member"]["name"], "octocat (GitHub)");
    assert_eq!(payload["member"]["role"], "BASHER");
    assert_eq!(payload["member"]["bashPoints"], 0);
    assert_eq!(payload["isOrganiser"], false);

    let token = payload["token"].as_str().unwrap();
    let claims = ctx.deps.jwt_service.verify_token(token).unwrap();
    assert_eq!(claims.github_username, "octocat");
    assert!(!claims.is_organiser);
    assert_eq!(
        claims.member_id.to_string(),
        payload["member"]["id"].as_str().unwrap()
    );

    let registered = Member::find_by_github_username("octocat", &ctx.db_pool)
        .await
        .unwrap();
    assert!(registered.is_some());
}

#[tokio::test]
async fn returning_basher_keeps_their_account() {
    let github = MockGithubClient::new().with_oauth_code("code-456", "OctoCat");
    let deps = TestDependencies::new()
        .mock_github(github)
        .organisers(&["octocat"]);
    let ctx = TestHarness::with_dependencies(deps).await.unwrap();
    let existing = create_basher(&ctx.db_pool, "octocat", 420).await.unwrap();

    let data = ctx
        .graphql()
        .query_with_vars(LOGIN, vars! { "code" => "code-456" })
        .await;
    let payload = &data["loginWithGithub"];

    assert_eq!(payload["member"]["id"], existing.id.to_string());
    assert_eq!(payload["member"]["bashPoints"], 420);
    assert_eq!(payload["isOrganiser"], true);

    let claims = ctx
        .deps
        .jwt_service
        .verify_token(payload["token"].as_str().unwrap())
        .unwrap();
    assert!(claims.is_organiser);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bad_code_is_rejected(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute_with_vars(LOGIN, vars! { "code" => "not-a-code" })
        .await;
    assert!(result.has_error("GitHub login failed"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn me_reflects_the_session(ctx: &TestHarness) {
    let basher = create_basher(&ctx.db_pool, "octo", 120).await.unwrap();

    let anonymous = ctx.graphql().execute("{ me { githubUsername } }").await;
    assert!(anonymous.has_error("Authentication required"));

    let signed_in = ctx
        .graphql_as(&basher)
        .query("{ me { githubUsername tier } }")
        .await;
    assert_eq!(signed_in["me"]["githubUsername"], "octo");
    assert_eq!(signed_in["me"]["tier"], "BRONZE");
}
