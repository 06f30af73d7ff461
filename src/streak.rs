use crate::models::{CompletionRecord, DateKey};

/// Upper bound on how far back a streak walk goes, roughly ten years.
pub const MAX_STREAK_LOOKBACK_DAYS: u32 = 3660;

/// Consecutive days, ending today, on which habit `index` was completed.
///
/// A day without the habit ends the run; when today itself is missing the
/// streak is 0 regardless of earlier days.
pub fn current_streak(completions: &CompletionRecord, index: usize, today: DateKey) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);

    while let Some(day) = cursor {
        if streak >= MAX_STREAK_LOOKBACK_DAYS {
            break;
        }
        let done = completions
            .get(&day)
            .is_some_and(|set| set.contains(&index));
        if !done {
            break;
        }
        streak += 1;
        cursor = day.pred();
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn record(days_ago: &[i64], index: usize) -> CompletionRecord {
        days_ago
            .iter()
            .map(|offset| {
                let key = DateKey::new(today() - Duration::days(*offset));
                (key, BTreeSet::from([index]))
            })
            .collect()
    }

    #[test]
    fn counts_today_and_previous_days() {
        let completions = record(&[0, 1, 2, 4], 0);
        assert_eq!(current_streak(&completions, 0, today().into()), 3);
    }

    #[test]
    fn missing_today_breaks_the_streak() {
        let completions = record(&[1, 2, 3], 0);
        assert_eq!(current_streak(&completions, 0, today().into()), 0);
    }

    #[test]
    fn other_habits_do_not_count() {
        let completions = record(&[0, 1], 1);
        assert_eq!(current_streak(&completions, 0, today().into()), 0);
        assert_eq!(current_streak(&completions, 1, today().into()), 2);
    }

    #[test]
    fn walk_crosses_month_and_year_boundaries() {
        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let completions: CompletionRecord = (0..40)
            .map(|offset| (DateKey::new(new_year - Duration::days(offset)), BTreeSet::from([0])))
            .collect();
        assert_eq!(current_streak(&completions, 0, new_year.into()), 40);
    }

    #[test]
    fn walk_stops_at_the_lookback_cap() {
        let completions: CompletionRecord = (0..(MAX_STREAK_LOOKBACK_DAYS as i64 + 10))
            .map(|offset| (DateKey::new(today() - Duration::days(offset)), BTreeSet::from([0])))
            .collect();
        assert_eq!(
            current_streak(&completions, 0, today().into()),
            MAX_STREAK_LOOKBACK_DAYS
        );
    }
}
