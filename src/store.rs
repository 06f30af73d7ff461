use crate::aggregate::{summarize_day, DaySummary};
use crate::calendar::is_past;
use crate::errors::StoreError;
use crate::models::{DateKey, Habit, HabitRecords, Task};
use crate::streak::current_streak;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// In-memory owner of habits, completions and per-day tasks.
///
/// Every mutation either applies fully and returns the recomputed summary of
/// the affected day, or is rejected without touching any record.
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    records: HabitRecords,
}

impl HabitStore {
    /// Builds a store from loaded records, dropping completion indices that
    /// point past the habit list and empty per-day entries.
    pub fn new(mut records: HabitRecords) -> Self {
        let habit_count = records.habits.len();
        let mut dropped = 0usize;
        for set in records.completions.values_mut() {
            let before = set.len();
            set.retain(|index| *index < habit_count);
            dropped += before - set.len();
        }
        if dropped > 0 {
            warn!(dropped, habit_count, "dropped completion entries for unknown habits");
        }
        records.completions.retain(|_, set| !set.is_empty());
        records.local_tasks.retain(|_, tasks| !tasks.is_empty());
        Self { records }
    }

    pub fn records(&self) -> &HabitRecords {
        &self.records
    }

    pub fn habits(&self) -> &[Habit] {
        &self.records.habits
    }

    pub fn tasks_on(&self, date: DateKey) -> &[Task] {
        self.records
            .local_tasks
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn completions_on(&self, date: DateKey) -> Option<&BTreeSet<usize>> {
        self.records.completions.get(&date)
    }

    pub fn is_habit_completed(&self, date: DateKey, index: usize) -> bool {
        self.completions_on(date)
            .is_some_and(|set| set.contains(&index))
    }

    pub fn summary(&self, date: DateKey, today: NaiveDate) -> DaySummary {
        summarize_day(
            self.records.habits.len(),
            self.completions_on(date),
            self.tasks_on(date),
            date.date(),
            today,
        )
    }

    pub fn streak(&self, index: usize, today: NaiveDate) -> u32 {
        current_streak(&self.records.completions, index, DateKey::new(today))
    }

    /// Appends a habit. Habits are global, so the selected date only picks
    /// which day's summary comes back.
    pub fn add_habit(
        &mut self,
        text: &str,
        selected: DateKey,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        let text = non_empty(text)?;
        self.records.habits.push(Habit { text });
        info!(count = self.records.habits.len(), "habit added");
        Ok(self.summary(selected, today))
    }

    /// Removes habit `index` and shifts every higher index down by one in
    /// all completion sets.
    pub fn delete_habit(
        &mut self,
        index: usize,
        selected: DateKey,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        if index >= self.records.habits.len() {
            return Err(StoreError::OutOfRange { index });
        }
        self.records.habits.remove(index);

        for set in self.records.completions.values_mut() {
            *set = set
                .iter()
                .filter(|member| **member != index)
                .map(|member| if *member > index { member - 1 } else { *member })
                .collect();
        }
        self.records.completions.retain(|_, set| !set.is_empty());

        info!(index, remaining = self.records.habits.len(), "habit deleted");
        Ok(self.summary(selected, today))
    }

    pub fn toggle_habit(
        &mut self,
        date: DateKey,
        index: usize,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        ensure_editable(date, today)?;
        if index >= self.records.habits.len() {
            return Err(StoreError::OutOfRange { index });
        }

        let set = self.records.completions.entry(date).or_default();
        if !set.remove(&index) {
            set.insert(index);
        }
        if set.is_empty() {
            self.records.completions.remove(&date);
        }
        Ok(self.summary(date, today))
    }

    pub fn add_task(
        &mut self,
        date: DateKey,
        text: &str,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        ensure_editable(date, today)?;
        let text = non_empty(text)?;
        self.records
            .local_tasks
            .entry(date)
            .or_default()
            .push(Task {
                text,
                completed: false,
            });
        Ok(self.summary(date, today))
    }

    pub fn toggle_task(
        &mut self,
        date: DateKey,
        index: usize,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        ensure_editable(date, today)?;
        let task = self
            .records
            .local_tasks
            .get_mut(&date)
            .and_then(|tasks| tasks.get_mut(index))
            .ok_or(StoreError::OutOfRange { index })?;
        task.completed = !task.completed;
        Ok(self.summary(date, today))
    }

    pub fn delete_task(
        &mut self,
        date: DateKey,
        index: usize,
        today: NaiveDate,
    ) -> Result<DaySummary, StoreError> {
        ensure_editable(date, today)?;
        let tasks = self
            .records
            .local_tasks
            .get_mut(&date)
            .filter(|tasks| index < tasks.len())
            .ok_or(StoreError::OutOfRange { index })?;
        tasks.remove(index);
        if tasks.is_empty() {
            self.records.local_tasks.remove(&date);
        }
        Ok(self.summary(date, today))
    }
}

fn ensure_editable(date: DateKey, today: NaiveDate) -> Result<(), StoreError> {
    if is_past(date.date(), today) {
        return Err(StoreError::PastDate(date));
    }
    Ok(())
}

fn non_empty(text: &str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyText);
    }
    Ok(trimmed.to_string())
}
