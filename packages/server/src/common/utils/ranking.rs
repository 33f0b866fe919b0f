//! Tied ranking and percentage helpers shared by the leaderboards and
//! attendance reports.

/// Standard competition ranks ("1224") for scores already sorted best-first.
/// Equal scores share a rank; the next distinct score skips ahead.
pub fn competition_ranks<S: PartialEq>(sorted_scores: &[S]) -> Vec<i32> {
    let mut ranks = Vec::with_capacity(sorted_scores.len());
    for (index, score) in sorted_scores.iter().enumerate() {
        let rank = match index.checked_sub(1) {
            Some(prev) if sorted_scores[prev] == *score => ranks[prev],
            _ => index as i32 + 1,
        };
        ranks.push(rank);
    }
    ranks
}

/// `part / whole` as a percentage rounded to two decimals; 0 for an empty whole.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round2(part as f64 * 100.0 / whole as f64)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_share_rank_and_skip() {
        assert_eq!(competition_ranks(&[900, 700, 700, 500]), vec![1, 2, 2, 4]);
    }

    #[test]
    fn all_tied() {
        assert_eq!(competition_ranks(&[10, 10, 10]), vec![1, 1, 1]);
    }

    #[test]
    fn distinct_scores_rank_sequentially() {
        assert_eq!(competition_ranks(&[3, 2, 1]), vec![1, 2, 3]);
    }

    #[test]
    fn empty_input() {
        assert!(competition_ranks::<i64>(&[]).is_empty());
    }

    #[test]
    fn float_percentages_tie() {
        assert_eq!(competition_ranks(&[50.0, 50.0, 42.86]), vec![1, 1, 3]);
    }

    #[test]
    fn three_of_seven() {
        assert_eq!(percentage(3, 7), 42.86);
    }

    #[test]
    fn percentage_edges() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(0, 5), 0.0);
        assert_eq!(percentage(5, 5), 100.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
    }
}
