use anyhow::{Context, Result};
use tracing::info;

use crate::common::{build_page_info, Cursor, MemberId, ValidatedPaginationArgs};
use crate::domains::members::data::{MemberConnection, MemberData, MemberEdge};
use crate::domains::members::models::Member;
use crate::kernel::ServerDeps;

pub async fn get_member(member_id: &str, deps: &ServerDeps) -> Result<Option<Member>> {
    let id = MemberId::parse(member_id).context("Invalid member id")?;
    Member::find_by_id_optional(id, &deps.db_pool).await
}

pub async fn get_member_by_github(username: &str, deps: &ServerDeps) -> Result<Option<Member>> {
    Member::find_by_github_username(username, &deps.db_pool).await
}

pub async fn get_members_paginated(
    args: &ValidatedPaginationArgs,
    deps: &ServerDeps,
) -> Result<MemberConnection> {
    info!("Getting paginated members");

    let pool = &deps.db_pool;

    let (members, has_more) = Member::find_paginated(args, pool).await?;
    let total_count = Member::count(pool).await? as i32;

    let edges: Vec<MemberEdge> = members
        .into_iter()
        .map(|member| {
            let cursor = Cursor::encode_uuid(member.id.into_uuid());
            MemberEdge {
                node: MemberData::from(member),
                cursor,
            }
        })
        .collect();

    let page_info = build_page_info(
        has_more,
        args,
        edges.first().map(|e| e.cursor.clone()),
        edges.last().map(|e| e.cursor.clone()),
    );

    Ok(MemberConnection {
        edges,
        page_info,
        total_count,
    })
}
