//! Tier classification by Bash Points.

use juniper::GraphQLEnum;
use serde::{Deserialize, Serialize};

use crate::common::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, GraphQLEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

/// Highest tier first; the first threshold a score reaches wins.
const THRESHOLDS: [(Tier, i32); 5] = [
    (Tier::Diamond, 2000),
    (Tier::Platinum, 1200),
    (Tier::Gold, 600),
    (Tier::Silver, 250),
    (Tier::Bronze, 100),
];

impl Tier {
    pub fn from_points(points: i32) -> Self {
        THRESHOLDS
            .iter()
            .find(|(_, min)| points >= *min)
            .map(|(tier, _)| *tier)
            .unwrap_or(Tier::Unranked)
    }

    pub fn min_points(&self) -> i32 {
        THRESHOLDS
            .iter()
            .find(|(tier, _)| tier == self)
            .map(|(_, min)| *min)
            .unwrap_or(0)
    }

    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Unranked => Some(Tier::Bronze),
            Tier::Bronze => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => Some(Tier::Diamond),
            Tier::Diamond => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Unranked => "unranked",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
            Tier::Diamond => "diamond",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a points value as typed into a form or query string.
pub fn tier(points: &str) -> Result<Tier, ValidationError> {
    points
        .trim()
        .parse::<i32>()
        .map(Tier::from_points)
        .map_err(|_| ValidationError::InvalidPoints(points.to_string()))
}

/// Points still missing for the next tier, `None` once at the top.
pub fn points_to_next_tier(points: i32) -> Option<i32> {
    Tier::from_points(points)
        .next()
        .map(|next| next.min_points() - points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_hundred_is_silver() {
        assert_eq!(tier("300").unwrap(), Tier::Silver);
        assert_eq!(tier("300").unwrap().label(), "silver");
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(Tier::from_points(99), Tier::Unranked);
        assert_eq!(Tier::from_points(100), Tier::Bronze);
        assert_eq!(Tier::from_points(249), Tier::Bronze);
        assert_eq!(Tier::from_points(250), Tier::Silver);
        assert_eq!(Tier::from_points(600), Tier::Gold);
        assert_eq!(Tier::from_points(1199), Tier::Gold);
        assert_eq!(Tier::from_points(1200), Tier::Platinum);
        assert_eq!(Tier::from_points(2000), Tier::Diamond);
        assert_eq!(Tier::from_points(1_000_000), Tier::Diamond);
    }

    #[test]
    fn negative_points_are_unranked() {
        assert_eq!(Tier::from_points(-40), Tier::Unranked);
        assert_eq!(tier("-40").unwrap(), Tier::Unranked);
    }

    #[test]
    fn parses_padded_input() {
        assert_eq!(tier(" 650 ").unwrap(), Tier::Gold);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            tier("lots"),
            Err(ValidationError::InvalidPoints("lots".to_string()))
        );
        assert!(tier("").is_err());
    }

    #[test]
    fn distance_to_next_tier() {
        assert_eq!(points_to_next_tier(0), Some(100));
        assert_eq!(points_to_next_tier(300), Some(300));
        assert_eq!(points_to_next_tier(-50), Some(150));
        assert_eq!(points_to_next_tier(2500), None);
    }

    #[test]
    fn tiers_order_by_rank() {
        assert!(Tier::Diamond > Tier::Gold);
        assert!(Tier::Bronze > Tier::Unranked);
    }
}
