//! GitHub OAuth sign-in.

use anyhow::{Context, Result};
use tracing::info;

use crate::common::{require_text, HasAuthContext};
use crate::domains::members::models::CreateMember;
use crate::domains::members::Member;
use crate::kernel::ServerDeps;

/// Organiser status is the stored role or the configured allow-list.
pub fn is_organiser<D: HasAuthContext>(member: &Member, deps: &D) -> bool {
    member.is_organiser() || deps.is_configured_organiser(&member.github_username)
}

/// Sign a session token for an existing basher.
pub fn issue_session_token(member: &Member, deps: &ServerDeps) -> Result<String> {
    deps.jwt_service.create_token(
        member.id.into_uuid(),
        member.github_username.clone(),
        is_organiser(member, deps),
    )
}

/// Exchange an OAuth code for a session, registering first-time bashers.
pub async fn login_with_github(code: String, deps: &ServerDeps) -> Result<(String, Member)> {
    let code = require_text("code", &code)?;

    let access_token = deps
        .github
        .exchange_oauth_code(&code)
        .await
        .context("GitHub sign-in failed")?;
    let user = deps
        .github
        .fetch_authenticated_user(&access_token)
        .await
        .context("Could not load GitHub profile")?;

    let member = match Member::find_by_github_username(&user.login, &deps.db_pool).await? {
        Some(member) => member,
        None => {
            let member = Member::create(
                CreateMember::builder()
                    .github_username(user.login.clone())
                    .name(user.name.clone().unwrap_or_else(|| user.login.clone()))
                    .avatar_url(Some(user.avatar_url.clone()))
                    .bio(user.bio.clone())
                    .build(),
                &deps.db_pool,
            )
            .await?;
            info!(member_id = %member.id, github = %member.github_username, "New basher registered");
            member
        }
    };

    let token = issue_session_token(&member, deps)?;
    info!(
        member_id = %member.id,
        organiser = is_organiser(&member, deps),
        "Basher signed in"
    );

    Ok((token, member))
}
