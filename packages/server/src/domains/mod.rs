// Business domains
pub mod achievements;
pub mod auth;
pub mod clans;
pub mod events;
pub mod leaderboard;
pub mod members;
pub mod notifications;
pub mod profiles;
