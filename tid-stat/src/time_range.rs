use chrono::{NaiveDate, NaiveDateTime};
use tid_utils::dates::{end_of_day, start_of_day};

/// An inclusive window of local date-times.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct TimeRange(pub NaiveDateTime, pub NaiveDateTime);

impl TimeRange {
    /// From the start of `from` through the last second of `to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        TimeRange(start_of_day(&from), end_of_day(&to))
    }

    pub fn unbounded() -> Self {
        TimeRange(NaiveDateTime::MIN, NaiveDateTime::MAX)
    }

    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        self.0 <= *instant && *instant <= self.1
    }
}
