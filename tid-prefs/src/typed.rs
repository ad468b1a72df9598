//! Typed values stored as preference strings.

use crate::PreferenceStore;
use chrono::NaiveDate;
use log::warn;
use tid_utils::dates::{format_date, parse_date};

/// List, station-id and date accessors for any [`PreferenceStore`].
pub trait PreferenceExt: PreferenceStore {
    /// Comma-separated entries, trimmed, empty entries dropped.
    fn get_list(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let raw = self.get(key, "")?;
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn put_list<S: AsRef<str>>(&self, key: &str, values: &[S]) -> anyhow::Result<()> {
        let joined = values.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",");
        self.put(key, &joined)
    }

    /// Station ids stored as `1,2` or `[1, 2]`. Every token is reduced to
    /// its digits; tokens without any are skipped.
    fn get_station_ids(&self, key: &str, default: &str) -> anyhow::Result<Vec<i64>> {
        let raw = self.get(key, default)?;
        let mut ids = Vec::new();
        for token in raw.split(',') {
            let digits: String = token.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                continue;
            }
            match digits.parse::<i64>() {
                Ok(id) => ids.push(id),
                Err(e) => warn!("Ignoring station id {:?} in {}: {}", token, key, e),
            }
        }
        Ok(ids)
    }

    fn put_station_ids(&self, key: &str, ids: &[i64]) -> anyhow::Result<()> {
        let joined = ids.iter().map(i64::to_string).collect::<Vec<String>>().join(",");
        self.put(key, &joined)
    }

    /// A `YYYY-MM-DD` date, `default` when absent or unreadable.
    fn get_date(&self, key: &str, default: NaiveDate) -> anyhow::Result<NaiveDate> {
        let raw = self.get(key, "")?;
        if raw.trim().is_empty() {
            return Ok(default);
        }
        Ok(parse_date(&raw).unwrap_or_else(|e| {
            warn!("Ignoring stored date {:?} for {}: {}", raw, key, e);
            default
        }))
    }

    fn put_date(&self, key: &str, date: &NaiveDate) -> anyhow::Result<()> {
        self.put(key, &format_date(date))
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keys, MemoryStore};

    #[test]
    fn lists_round_trip_through_commas() {
        let prefs = MemoryStore::new();
        assert!(prefs.get_list(keys::PRODUCTS).unwrap().is_empty());
        prefs.put_list(keys::PRODUCTS, &["Accommodation services", "Food and beverage serving services"]).unwrap();
        assert_eq!(
            prefs.get(keys::PRODUCTS, "").unwrap(),
            "Accommodation services,Food and beverage serving services"
        );
        prefs.put(keys::YEARS, " 2018, ,2019 ").unwrap();
        assert_eq!(prefs.get_list(keys::YEARS).unwrap(), vec!["2018", "2019"]);
    }

    #[test]
    fn station_ids_tolerate_brackets() {
        let prefs = MemoryStore::new();
        assert_eq!(prefs.get_station_ids(keys::WEATHER_LOCATION, keys::DEFAULT_STATION).unwrap(), vec![0]);
        prefs.put(keys::WEATHER_LOCATION, "[1001, 1012]").unwrap();
        assert_eq!(prefs.get_station_ids(keys::WEATHER_LOCATION, "0").unwrap(), vec![1001, 1012]);
        prefs.put(keys::WEATHER_LOCATION, "abc,23001").unwrap();
        assert_eq!(prefs.get_station_ids(keys::WEATHER_LOCATION, "0").unwrap(), vec![23001]);
        prefs.put_station_ids(keys::TRAFFIC_LOCATION, &[23001, 23002]).unwrap();
        assert_eq!(prefs.get(keys::TRAFFIC_LOCATION, "").unwrap(), "23001,23002");
    }

    #[test]
    fn dates_fall_back_to_default() {
        let prefs = MemoryStore::new();
        let default = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(prefs.get_date(keys::WEATHER_DATE, default).unwrap(), default);
        prefs.put(keys::WEATHER_DATE, "1.12.2024").unwrap();
        assert_eq!(prefs.get_date(keys::WEATHER_DATE, default).unwrap(), default);
        let stored = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        prefs.put_date(keys::WEATHER_DATE, &stored).unwrap();
        assert_eq!(prefs.get_date(keys::WEATHER_DATE, default).unwrap(), stored);
    }
}
