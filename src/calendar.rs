use chrono::{Datelike, Months, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in a month. `month0` is zero-based (0 = January); anything
/// past December yields 0.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 if is_leap_year(year) => 29,
        1 => 28,
        _ => 0,
    }
}

/// Weekday of the 1st of the month, 0 = Sunday.
pub fn first_weekday_index(year: i32, month0: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Ordinal day within the year, Jan 1 = 1.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn year_progress_percent(date: NaiveDate) -> u32 {
    rounded_percent(day_of_year(date), days_in_year(date.year()))
}

pub fn month_progress_percent(date: NaiveDate) -> u32 {
    rounded_percent(date.day(), days_in_month(date.year(), date.month0()))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from the month containing `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let start = month_start(date);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        start.checked_add_months(months)
    } else {
        start.checked_sub_months(months)
    };
    shifted.unwrap_or(start)
}

pub fn month_label(year: i32, month0: u32) -> String {
    let name = MONTH_NAMES.get(month0 as usize).copied().unwrap_or("");
    format!("{name} {year}").to_uppercase()
}

fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}
