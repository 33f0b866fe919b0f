use juniper::GraphQLObject;

use crate::domains::members::MemberData;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A signed-in session")]
pub struct AuthPayload {
    /// Send as `Authorization: Bearer <token>`
    pub token: String,
    pub member: MemberData,
    pub is_organiser: bool,
}
