//! Leaderboard domain - ranking over members and clans

pub mod actions;
pub mod data;

pub use data::{ClanLeaderboardEntryData, LeaderboardEntryData};
