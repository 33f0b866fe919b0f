//! Activity streaks over a daily calendar.
//!
//! A day is active when its count is positive. The current streak may end
//! today or yesterday, so a basher who has not solved anything yet today
//! keeps their streak until midnight UTC.

use chrono::{DateTime, Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakSummary {
    pub current: i32,
    pub longest: i32,
    pub active_days: i32,
    pub total: i64,
}

pub fn compute_streak(calendar: &BTreeMap<NaiveDate, i64>, today: NaiveDate) -> StreakSummary {
    let mut summary = StreakSummary::default();
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (&day, &count) in calendar.iter().filter(|&(_, &count)| count > 0) {
        summary.active_days += 1;
        summary.total += count;

        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        summary.longest = summary.longest.max(run);
        previous = Some(day);
    }

    // `run` is the streak ending on the last active day.
    if let Some(last) = previous {
        let yesterday = today - Duration::days(1);
        if last == today || last == yesterday {
            summary.current = run;
        }
    }

    summary
}

/// Convert a LeetCode-style submission calendar (`"unix seconds" -> count`)
/// into UTC days. Entries falling on the same day are summed; keys that are
/// not timestamps are skipped.
pub fn calendar_from_timestamps(raw: &HashMap<String, i64>) -> BTreeMap<NaiveDate, i64> {
    let mut calendar = BTreeMap::new();
    for (key, count) in raw {
        let Some(day) = key
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|ts| ts.date_naive())
        else {
            continue;
        };
        *calendar.entry(day).or_insert(0) += count;
    }
    calendar
}
