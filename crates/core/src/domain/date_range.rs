use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest span, in whole days rounded up, a report may cover.
pub const MAX_RANGE_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Inclusive report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Absolute span in days, rounded up.
    pub fn span_days(&self) -> i64 {
        let millis = (self.to - self.from).num_milliseconds().abs();
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    pub fn is_valid(&self) -> bool {
        is_valid_date_range(self.from, self.to)
    }
}

pub fn is_valid_date_range(from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    DateRange::new(from, to).span_days() <= MAX_RANGE_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn three_days_is_valid_four_is_not() {
        assert!(is_valid_date_range(at(2024, 1, 1), at(2024, 1, 4)));
        assert!(!is_valid_date_range(at(2024, 1, 1), at(2024, 1, 5)));
    }

    #[test]
    fn partial_days_round_up() {
        let from = at(2024, 1, 1);
        let to = at(2024, 1, 4) + Duration::seconds(1);
        assert_eq!(DateRange::new(from, to).span_days(), 4);
        assert!(!is_valid_date_range(from, to));

        let to = at(2024, 1, 1) + Duration::hours(1);
        assert_eq!(DateRange::new(from, to).span_days(), 1);
    }

    #[test]
    fn span_ignores_direction() {
        assert!(is_valid_date_range(at(2024, 1, 4), at(2024, 1, 1)));
        assert!(!is_valid_date_range(at(2024, 1, 9), at(2024, 1, 1)));
        assert_eq!(DateRange::new(at(2024, 1, 2), at(2024, 1, 2)).span_days(), 0);
    }

    #[test]
    fn crosses_month_boundary() {
        let range = DateRange::new(at(2024, 2, 28), at(2024, 3, 2));
        assert_eq!(range.span_days(), 3);
        assert!(range.is_valid());
    }
}
