//! Shared utility functions for TID crates.

/// Date utility functions
pub mod dates {
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

    /// Date format used for preferences and command-line arguments: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// First instant of the given day.
    pub fn start_of_day(date: &NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    /// Last whole second of the given day (23:59:59).
    pub fn end_of_day(date: &NaiveDate) -> NaiveDateTime {
        start_of_day(date) + Duration::days(1) - Duration::seconds(1)
    }

    /// The default sensor window: yesterday through today.
    pub fn default_window(today: &NaiveDate) -> (NaiveDate, NaiveDate) {
        (*today - Duration::days(1), *today)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_rejects_other_layouts() {
            assert!(parse_date("15.06.2023").is_err());
            assert!(parse_date("").is_err());
        }

        #[test]
        fn test_day_bounds() {
            let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(start_of_day(&date).to_string(), "2024-02-29 00:00:00");
            assert_eq!(end_of_day(&date).to_string(), "2024-02-29 23:59:59");
        }

        #[test]
        fn test_default_window_crosses_month() {
            let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            let (from, to) = default_window(&today);
            assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
            assert_eq!(to, today);
        }
    }
}
