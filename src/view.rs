use crate::aggregate::{Band, DaySummary};
use crate::calendar::{
    day_of_year, days_in_month, first_weekday_index, is_past, month_label, month_progress_percent,
    month_start, shift_month, year_progress_percent,
};
use crate::models::DateKey;
use crate::store::HabitStore;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HabitRow {
    pub index: usize,
    pub text: String,
    pub completed: bool,
    pub streak: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub index: usize,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: DateKey,
    pub is_today: bool,
    /// False for past days; mutation controls are hidden.
    pub editable: bool,
    pub summary: DaySummary,
    pub habits: Vec<HabitRow>,
    pub tasks: Vec<TaskRow>,
    pub storage_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub date: DateKey,
    pub completed: usize,
    pub total: usize,
    pub band: Option<Band>,
    pub selected: bool,
    pub today: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Empty,
    Day(DayCell),
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month0: u32,
    pub label: String,
    pub month: DateKey,
    pub prev_month: DateKey,
    pub next_month: DateKey,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeProgress {
    pub date: DateKey,
    pub day_of_year: u32,
    pub day_of_month: u32,
    pub year_percent: u32,
    pub month_percent: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarPage {
    pub month: MonthView,
    pub day: DayView,
    pub progress: TimeProgress,
}

pub fn build_day_view(
    store: &HabitStore,
    date: DateKey,
    today: NaiveDate,
    storage_error: Option<&str>,
) -> DayView {
    let habits = store
        .habits()
        .iter()
        .enumerate()
        .map(|(index, habit)| HabitRow {
            index,
            text: habit.text.clone(),
            completed: store.is_habit_completed(date, index),
            streak: store.streak(index, today),
        })
        .collect();
    let tasks = store
        .tasks_on(date)
        .iter()
        .enumerate()
        .map(|(index, task)| TaskRow {
            index,
            text: task.text.clone(),
            completed: task.completed,
        })
        .collect();

    DayView {
        date,
        is_today: date.date() == today,
        editable: !is_past(date.date(), today),
        summary: store.summary(date, today),
        habits,
        tasks,
        storage_error: storage_error.map(str::to_string),
    }
}

/// Month grid for the month containing `month`: leading blanks up to the
/// weekday of the 1st, then one cell per day.
pub fn build_month_view(
    store: &HabitStore,
    month: NaiveDate,
    selected: DateKey,
    today: NaiveDate,
) -> MonthView {
    let start = month_start(month);
    let (year, month0) = (start.year(), start.month0());
    let leading = first_weekday_index(year, month0) as usize;
    let length = days_in_month(year, month0);

    let mut cells = Vec::with_capacity(leading + length as usize);
    cells.extend(std::iter::repeat_n(CalendarCell::Empty, leading));
    for day in 1..=length {
        let Some(date) = start.with_day(day) else {
            continue;
        };
        let key = DateKey::new(date);
        let summary = store.summary(key, today);
        cells.push(CalendarCell::Day(DayCell {
            day,
            date: key,
            completed: summary.completed,
            total: summary.total,
            band: summary.band,
            selected: key == selected,
            today: date == today,
        }));
    }

    MonthView {
        year,
        month0,
        label: month_label(year, month0),
        month: DateKey::new(start),
        prev_month: DateKey::new(shift_month(start, -1)),
        next_month: DateKey::new(shift_month(start, 1)),
        cells,
    }
}

pub fn time_progress(today: NaiveDate) -> TimeProgress {
    TimeProgress {
        date: DateKey::new(today),
        day_of_year: day_of_year(today),
        day_of_month: today.day(),
        year_percent: year_progress_percent(today),
        month_percent: month_progress_percent(today),
    }
}

pub fn build_page(
    store: &HabitStore,
    selected: DateKey,
    month: NaiveDate,
    today: NaiveDate,
    storage_error: Option<&str>,
) -> CalendarPage {
    CalendarPage {
        month: build_month_view(store, month, selected, today),
        day: build_day_view(store, selected, today, storage_error),
        progress: time_progress(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Habit, HabitRecords};
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn sample_store() -> HabitStore {
        let mut records = HabitRecords {
            habits: vec![Habit { text: "read".into() }, Habit { text: "walk".into() }],
            ..HabitRecords::default()
        };
        records
            .completions
            .insert(DateKey::new(today()), BTreeSet::from([0, 1]));
        records
            .completions
            .insert(DateKey::new(today().pred_opt().unwrap()), BTreeSet::from([0]));
        HabitStore::new(records)
    }

    fn day_cell(view: &MonthView, day: u32) -> &DayCell {
        view.cells
            .iter()
            .find_map(|cell| match cell {
                CalendarCell::Day(cell) if cell.day == day => Some(cell),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn month_grid_starts_on_the_right_weekday() {
        let store = sample_store();
        let view = build_month_view(&store, today(), DateKey::new(today()), today());
        // October 2026 starts on a Thursday.
        assert!(view.cells[..4].iter().all(|cell| matches!(cell, CalendarCell::Empty)));
        assert_eq!(view.cells.len(), 4 + 31);
        assert_eq!(view.label, "OCTOBER 2026");
        assert_eq!(view.prev_month.to_string(), "2026-09-01");
        assert_eq!(view.next_month.to_string(), "2026-11-01");
    }

    #[test]
    fn cells_carry_bands_up_to_today_only() {
        let store = sample_store();
        let view = build_month_view(&store, today(), DateKey::new(today()), today());

        let cell = day_cell(&view, 18);
        assert_eq!(cell.band, Some(Band::Perfect));
        assert!(cell.selected && cell.today);
        assert_eq!(day_cell(&view, 17).band, Some(Band::Fail));
        assert_eq!(day_cell(&view, 1).band, Some(Band::FailCritical));
        assert_eq!(day_cell(&view, 19).band, None);
    }

    #[test]
    fn day_view_lists_habits_with_streaks() {
        let store = sample_store();
        let view = build_day_view(&store, DateKey::new(today()), today(), None);
        assert!(view.editable && view.is_today);
        assert_eq!(view.habits[0].streak, 2);
        assert_eq!(view.habits[1].streak, 1);
        assert!(view.habits.iter().all(|row| row.completed));
        assert_eq!(view.summary.rounded_percent, 100);
    }

    #[test]
    fn past_day_view_is_read_only() {
        let store = sample_store();
        let yesterday = DateKey::new(today().pred_opt().unwrap());
        let view = build_day_view(&store, yesterday, today(), Some("disk full"));
        assert!(!view.editable);
        assert!(view.habits[0].completed);
        assert!(!view.habits[1].completed);
        // streaks stay anchored at today
        assert_eq!(view.habits[0].streak, 2);
        assert_eq!(view.storage_error.as_deref(), Some("disk full"));
    }

    #[test]
    fn progress_uses_the_current_day() {
        let progress = time_progress(today());
        assert_eq!(progress.day_of_year, 291);
        assert_eq!(progress.year_percent, 80);
        assert_eq!(progress.month_percent, 58);
    }

    #[test]
    fn cells_serialize_with_a_kind_tag() {
        let store = sample_store();
        let view = build_month_view(&store, today(), DateKey::new(today()), today());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["cells"][0]["kind"], "empty");
        assert_eq!(json["cells"][4]["kind"], "day");
        assert_eq!(json["cells"][4]["date"], "2026-10-01");
    }
}
