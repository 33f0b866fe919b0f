pub mod ranking;
pub mod streak;
pub mod tiers;

pub use ranking::{competition_ranks, percentage, round2};
pub use streak::{calendar_from_timestamps, compute_streak, StreakSummary};
pub use tiers::{points_to_next_tier, tier, Tier};
