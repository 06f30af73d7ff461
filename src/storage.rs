use crate::errors::StorageError;
use crate::models::{CompletionRecord, DateKey, Habit, HabitRecords, LocalTaskRecord, Task};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub const HABITS_RECORD: &str = "habits";
pub const COMPLETIONS_RECORD: &str = "completions";
pub const LOCAL_TASKS_RECORD: &str = "localTasks";

const RECORD_NAMES: [&str; 3] = [HABITS_RECORD, COMPLETIONS_RECORD, LOCAL_TASKS_RECORD];

/// Habit entries as found on disk. Early data stored bare strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredHabit {
    Legacy(String),
    Record(Habit),
}

enum Loaded<T> {
    Present(T),
    Missing,
    Damaged,
}

impl<T: Default> Loaded<T> {
    fn unwrap_or_default(self) -> T {
        match self {
            Loaded::Present(record) => record,
            Loaded::Missing | Loaded::Damaged => T::default(),
        }
    }
}

/// Loads the three records from `dir`. Each one falls back to empty on its
/// own when missing or unreadable; an unreadable file is copied aside first
/// so the next save cannot destroy it.
pub async fn load_records(dir: &Path) -> HabitRecords {
    let stored_habits = load_record::<Vec<Value>>(dir, HABITS_RECORD).await;
    if matches!(stored_habits, Loaded::Damaged) {
        // Completion indices point into the lost habit list.
        back_up(dir, COMPLETIONS_RECORD).await;
    }
    let raw_completions: BTreeMap<String, Vec<usize>> =
        load_record(dir, COMPLETIONS_RECORD).await.unwrap_or_default();
    let raw_tasks: BTreeMap<String, Vec<Task>> =
        load_record(dir, LOCAL_TASKS_RECORD).await.unwrap_or_default();

    HabitRecords {
        habits: upgrade_habits(stored_habits.unwrap_or_default()),
        completions: parse_completions(raw_completions),
        local_tasks: parse_local_tasks(raw_tasks),
    }
}

/// Writes all three records. Every payload is staged next to its record
/// before any record is replaced, so a failed write leaves the previous
/// state on disk intact.
pub async fn persist_records(dir: &Path, records: &HabitRecords) -> Result<(), StorageError> {
    fs::create_dir_all(dir).await?;
    let staged = [
        (HABITS_RECORD, serde_json::to_vec_pretty(&records.habits)?),
        (COMPLETIONS_RECORD, serde_json::to_vec_pretty(&records.completions)?),
        (LOCAL_TASKS_RECORD, serde_json::to_vec_pretty(&records.local_tasks)?),
    ];

    for (name, payload) in &staged {
        if let Err(err) = fs::write(staging_path(dir, name), payload).await {
            discard_staged(dir).await;
            return Err(err.into());
        }
    }
    for (name, _) in &staged {
        fs::rename(staging_path(dir, name), record_path(dir, name)).await?;
    }
    Ok(())
}

fn record_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

fn staging_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json.tmp"))
}

async fn discard_staged(dir: &Path) {
    for name in RECORD_NAMES {
        let _ = fs::remove_file(staging_path(dir, name)).await;
    }
}

async fn load_record<T: DeserializeOwned>(dir: &Path, name: &str) -> Loaded<T> {
    let path = record_path(dir, name);
    match fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(record) => Loaded::Present(record),
            Err(err) => {
                error!("failed to parse {name} record: {err}");
                back_up(dir, name).await;
                Loaded::Damaged
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Loaded::Missing,
        Err(err) => {
            error!("failed to read {name} record: {err}");
            back_up(dir, name).await;
            Loaded::Damaged
        }
    }
}

/// Copies a record to `<name>.backup-<timestamp>.json`.
async fn back_up(dir: &Path, name: &str) {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let target = dir.join(format!("{name}.backup-{stamp}.json"));
    match fs::copy(record_path(dir, name), &target).await {
        Ok(_) => warn!("kept a copy of the {name} record at {}", target.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => error!("failed to back up {name} record: {err}"),
    }
}

/// Upgrades stored habits in place. Entries of unknown shape keep their
/// position, with the raw JSON as text, so completion indices stay aligned.
fn upgrade_habits(stored: Vec<Value>) -> Vec<Habit> {
    let mut upgraded = 0usize;
    let habits = stored
        .iter()
        .enumerate()
        .map(|(index, value)| match StoredHabit::deserialize(value) {
            Ok(StoredHabit::Legacy(text)) => {
                upgraded += 1;
                Habit { text }
            }
            Ok(StoredHabit::Record(habit)) => habit,
            Err(_) => {
                warn!(index, "unrecognized habit entry kept as raw text");
                Habit {
                    text: value.to_string(),
                }
            }
        })
        .collect();
    if upgraded > 0 {
        info!(upgraded, "upgraded legacy habit entries");
    }
    habits
}

fn parse_completions(raw: BTreeMap<String, Vec<usize>>) -> CompletionRecord {
    let mut completions = CompletionRecord::new();
    for (key, indices) in raw {
        match key.parse::<DateKey>() {
            // Legacy and ISO keys for the same day merge into one set.
            Ok(date) => completions.entry(date).or_default().extend(indices),
            Err(err) => warn!("skipping completions entry: {err}"),
        }
    }
    completions
}

fn parse_local_tasks(raw: BTreeMap<String, Vec<Task>>) -> LocalTaskRecord {
    let mut local_tasks = LocalTaskRecord::new();
    for (key, tasks) in raw {
        match key.parse::<DateKey>() {
            Ok(date) => local_tasks.entry(date).or_default().extend(tasks),
            Err(err) => warn!("skipping local tasks entry: {err}"),
        }
    }
    local_tasks
}
