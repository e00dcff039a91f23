use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::date_range::{DateRange, MAX_RANGE_DAYS};

// Earliest date the date picker offers.
const EPOCH_FLOOR: (i32, u32, u32) = (1900, 1, 1);

pub fn epoch_floor() -> NaiveDate {
    let (y, m, d) = EPOCH_FLOOR;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// The window a fresh session starts with: the last three days up to `now`.
pub fn default_date_range(now: DateTime<Utc>) -> DateRange {
    DateRange::new(now - Duration::days(MAX_RANGE_DAYS), now)
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn is_selectable_from(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today && date >= epoch_floor()
}

pub fn is_selectable_to(date: NaiveDate, from: NaiveDate, today: NaiveDate) -> bool {
    date <= today && date >= from
}

pub fn parse_date_arg(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}; expected YYYY-MM-DD"))
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
