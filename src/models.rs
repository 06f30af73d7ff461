use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ISO_FORMAT: &str = "%Y-%m-%d";
// `Date.prototype.toDateString()` output, e.g. "Sat Oct 18 2026".
const LEGACY_FORMAT: &str = "%a %b %d %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A calendar day used as the key of every per-day record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn pred(self) -> Option<Self> {
        self.0.checked_sub_signed(Duration::days(1)).map(Self)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{0}', expected YYYY-MM-DD")]
pub struct InvalidDateKey(pub String);

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, LEGACY_FORMAT))
            .map(Self)
            .map_err(|_| InvalidDateKey(value.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub type CompletionRecord = BTreeMap<DateKey, BTreeSet<usize>>;
pub type LocalTaskRecord = BTreeMap<DateKey, Vec<Task>>;

/// The persisted state: global habits, per-day completions and per-day tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitRecords {
    pub habits: Vec<Habit>,
    pub completions: CompletionRecord,
    pub local_tasks: LocalTaskRecord,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AddHabitForm {
    pub text: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_keys_parse_iso_and_legacy_forms() {
        let iso: DateKey = "2026-10-18".parse().unwrap();
        let legacy: DateKey = "Sun Oct 18 2026".parse().unwrap();
        assert_eq!(iso, legacy);
        assert_eq!(legacy.to_string(), "2026-10-18");
        assert!("18/10/2026".parse::<DateKey>().is_err());
    }

    #[test]
    fn date_keys_serialize_as_iso_strings() {
        let key: DateKey = "2024-02-29".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-02-29\"");
        let back: DateKey = serde_json::from_str("\"Thu Feb 29 2024\"").unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn pred_steps_back_one_day() {
        let key: DateKey = "2026-03-01".parse().unwrap();
        assert_eq!(key.pred().unwrap().to_string(), "2026-02-28");
    }
}
