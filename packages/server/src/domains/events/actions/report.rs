//! Attendance aggregation over a single snapshot of members and attendees.

use std::collections::HashSet;

use crate::common::utils::{competition_ranks, percentage};
use crate::common::{ClanId, MemberId};
use crate::domains::events::data::{AttendanceReportData, ClanAttendanceData};

/// Who belongs where, as read from the members table
#[derive(Debug, Clone, Copy)]
pub struct Roster {
    pub member_id: MemberId,
    pub clan_id: Option<ClanId>,
}

/// Clans are ranked by attendance percentage, ties sharing a rank and the
/// clan name deciding display order. Clanless members only count towards
/// the overall figure.
pub fn aggregate_attendance(
    event_id: String,
    roster: &[Roster],
    clans: &[(ClanId, String)],
    attendees: &HashSet<MemberId>,
) -> AttendanceReportData {
    let total_members = roster.len() as i64;
    let total_attendees = roster
        .iter()
        .filter(|entry| attendees.contains(&entry.member_id))
        .count() as i64;

    let mut rows: Vec<ClanAttendanceData> = clans
        .iter()
        .map(|(clan_id, name)| {
            let members: Vec<&Roster> = roster
                .iter()
                .filter(|entry| entry.clan_id == Some(*clan_id))
                .collect();
            let attended = members
                .iter()
                .filter(|entry| attendees.contains(&entry.member_id))
                .count() as i64;

            ClanAttendanceData {
                rank: 0,
                clan_id: clan_id.to_string(),
                clan_name: name.clone(),
                attended: attended as i32,
                members: members.len() as i32,
                percentage: percentage(attended, members.len() as i64),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.clan_name.to_lowercase().cmp(&b.clan_name.to_lowercase()))
    });

    let scores: Vec<f64> = rows.iter().map(|row| row.percentage).collect();
    for (row, rank) in rows.iter_mut().zip(competition_ranks(&scores)) {
        row.rank = rank;
    }

    AttendanceReportData {
        event_id,
        total_attendees: total_attendees as i32,
        total_members: total_members as i32,
        percentage: percentage(total_attendees, total_members),
        clans: rows,
    }
}
