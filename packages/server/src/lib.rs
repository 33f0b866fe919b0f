// Byte Bash Blitz - API Core
//
// Backend for the Byte Bash Blitz coding club: bashers, clans, Bash Points,
// leaderboards, events and attendance, achievements, notifications and
// profiles that pull in GitHub, LeetCode, Duolingo and Discord stats.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
