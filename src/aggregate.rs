use crate::models::Task;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Perfect,
    Success,
    Fail,
    FailCritical,
}

impl Band {
    /// CSS classes painted on a calendar cell.
    pub fn css_class(self) -> &'static str {
        match self {
            Band::Perfect => "perfect",
            Band::Success => "success",
            Band::Fail => "fail",
            Band::FailCritical => "fail neon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaySummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub rounded_percent: u32,
    pub band: Option<Band>,
}

/// Combines the global habit count, a day's completion set and its tasks.
///
/// Completion indices at or beyond `habit_count` are not counted, so
/// `completed <= total` holds even for stale records.
pub fn summarize_day(
    habit_count: usize,
    completions: Option<&BTreeSet<usize>>,
    tasks: &[Task],
    date: NaiveDate,
    today: NaiveDate,
) -> DaySummary {
    let habits_done = completions
        .map(|set| set.range(..habit_count).count())
        .unwrap_or(0);
    let tasks_done = tasks.iter().filter(|task| task.completed).count();

    let completed = habits_done + tasks_done;
    let total = habit_count + tasks.len();
    let percentage = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    DaySummary {
        completed,
        total,
        percentage,
        rounded_percent: percentage.round() as u32,
        band: classify(completed, total, date, today),
    }
}

/// Status band of a day. Empty and future days have none; 60% and 100%
/// belong to the higher band.
pub fn classify(completed: usize, total: usize, date: NaiveDate, today: NaiveDate) -> Option<Band> {
    if total == 0 || date > today {
        return None;
    }

    let band = if completed >= total {
        Band::Perfect
    } else if completed * 100 >= total * 60 {
        Band::Success
    } else if completed == 0 {
        Band::FailCritical
    } else {
        Band::Fail
    };
    Some(band)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn task(completed: bool) -> Task {
        Task {
            text: "task".to_string(),
            completed,
        }
    }

    #[test]
    fn counts_habits_and_tasks_together() {
        let set = BTreeSet::from([0, 2]);
        let tasks = vec![task(true), task(false)];
        let summary = summarize_day(3, Some(&set), &tasks, today(), today());
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.rounded_percent, 60);
        assert_eq!(summary.band, Some(Band::Success));
    }

    #[test]
    fn empty_day_has_no_band() {
        let summary = summarize_day(0, None, &[], today(), today());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.band, None);
    }

    #[test]
    fn future_days_have_no_band() {
        let tomorrow = today().succ_opt().unwrap();
        let set = BTreeSet::from([0]);
        let summary = summarize_day(1, Some(&set), &[], tomorrow, today());
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.band, None);
    }

    #[test]
    fn boundaries_round_up_to_the_higher_band() {
        let day = today();
        assert_eq!(classify(5, 5, day, day), Some(Band::Perfect));
        assert_eq!(classify(3, 5, day, day), Some(Band::Success));
        assert_eq!(classify(4, 5, day, day), Some(Band::Success));
        assert_eq!(classify(59, 100, day, day), Some(Band::Fail));
        assert_eq!(classify(1, 100, day, day), Some(Band::Fail));
        assert_eq!(classify(0, 100, day, day), Some(Band::FailCritical));
    }

    #[test]
    fn stale_indices_are_not_counted() {
        let set = BTreeSet::from([0, 1, 7]);
        let summary = summarize_day(2, Some(&set), &[], today(), today());
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.band, Some(Band::Perfect));
    }

    #[test]
    fn completed_never_exceeds_total() {
        for habits in 0..4usize {
            for done in 0..=habits {
                for task_count in 0..3usize {
                    let set: BTreeSet<usize> = (0..done).collect();
                    let tasks: Vec<Task> = (0..task_count).map(|i| task(i % 2 == 0)).collect();
                    let summary = summarize_day(habits, Some(&set), &tasks, today(), today());
                    assert!(summary.completed <= summary.total);
                    assert_eq!(summary.total == 0, habits == 0 && task_count == 0);
                }
            }
        }
    }

    #[test]
    fn past_days_keep_their_band() {
        let yesterday = today().pred_opt().unwrap();
        let summary = summarize_day(2, None, &[], yesterday, today());
        assert_eq!(summary.band, Some(Band::FailCritical));
    }
}
