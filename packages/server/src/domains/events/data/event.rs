use chrono::{DateTime, Utc};
use juniper::{FieldResult, GraphQLInputObject, GraphQLObject};

use crate::common::EventId;
use crate::domains::events::models::{Attendance, Event};
use crate::domains::members::{Member, MemberData};
use crate::server::graphql::context::GraphQLContext;

#[derive(Debug, Clone)]
pub struct EventData {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventData {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            venue: event.venue,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            points: event.points,
            created_at: event.created_at,
        }
    }
}

/// A club event
#[juniper::graphql_object(Context = GraphQLContext)]
impl EventData {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Bash Points each attendee earns
    fn points(&self) -> i32 {
        self.points
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    async fn attendee_count(&self, ctx: &GraphQLContext) -> FieldResult<i32> {
        Ok(Attendance::count_for_event(self.id, &ctx.db_pool).await? as i32)
    }

    async fn attendees(&self, ctx: &GraphQLContext) -> FieldResult<Vec<MemberData>> {
        let ids = Attendance::member_ids_for_event(self.id, &ctx.db_pool).await?;
        let members = Member::find_by_ids(&ids, &ctx.db_pool).await?;
        Ok(members.into_iter().map(MemberData::from).collect())
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Defaults to 0
    pub points: Option<i32>,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct MarkAttendanceResult {
    /// Bashers marked by this call
    pub newly_marked: i32,
    /// Bashers who were already marked and were left untouched
    pub already_marked: i32,
    pub points_per_attendee: i32,
}

#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(description = "Attendance of one clan at an event")]
pub struct ClanAttendanceData {
    pub rank: i32,
    pub clan_id: String,
    pub clan_name: String,
    pub attended: i32,
    pub members: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(description = "Who showed up to an event, overall and per clan")]
pub struct AttendanceReportData {
    pub event_id: String,
    pub total_attendees: i32,
    pub total_members: i32,
    pub percentage: f64,
    pub clans: Vec<ClanAttendanceData>,
}

#[derive(Debug, Clone, PartialEq, GraphQLObject)]
pub struct MemberAttendanceData {
    pub member_id: String,
    pub attended: i32,
    /// Events that have started since the basher joined
    pub eligible_events: i32,
    pub percentage: f64,
}
