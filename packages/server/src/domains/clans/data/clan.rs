use chrono::{DateTime, Utc};
use juniper::{FieldResult, GraphQLInputObject};

use crate::common::ClanId;
use crate::domains::clans::models::Clan;
use crate::domains::members::{Member, MemberData};
use crate::server::graphql::context::GraphQLContext;

#[derive(Debug, Clone)]
pub struct ClanData {
    pub id: ClanId,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Clan> for ClanData {
    fn from(clan: Clan) -> Self {
        Self {
            id: clan.id,
            name: clan.name,
            description: clan.description,
            logo_url: clan.logo_url,
            banner_url: clan.banner_url,
            created_at: clan.created_at,
        }
    }
}

/// A clan of bashers
#[juniper::graphql_object(Context = GraphQLContext)]
impl ClanData {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    fn banner_url(&self) -> Option<&str> {
        self.banner_url.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Members of this clan, highest points first
    async fn members(&self, ctx: &GraphQLContext) -> FieldResult<Vec<MemberData>> {
        let members = Member::find_by_clan(self.id, &ctx.db_pool).await?;
        Ok(members.into_iter().map(MemberData::from).collect())
    }

    async fn member_count(&self, ctx: &GraphQLContext) -> FieldResult<i32> {
        Ok(Clan::standing(self.id, &ctx.db_pool).await?.member_count)
    }

    /// Sum of every member's Bash Points
    async fn total_points(&self, ctx: &GraphQLContext) -> FieldResult<i32> {
        Ok(Clan::standing(self.id, &ctx.db_pool).await?.total_points)
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct ClanInput {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}
