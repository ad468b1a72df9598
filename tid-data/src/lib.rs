//! Aggregation of decoded tourism statistics.
//!
//! This crate turns the flat records of `tid-stat` into the totals the
//! presentation layer draws: pie slices per age group or gender, and a
//! location's share of the whole country.

/// Grouping and percentage helpers.
pub mod aggregate {
    use std::collections::HashMap;

    /// Sum `value` per `key`, keys in first-seen order.
    pub fn sum_by<T, K, V>(records: &[T], key: K, value: V) -> Vec<(String, f64)>
    where
        K: Fn(&T) -> &str,
        V: Fn(&T) -> f64,
    {
        let mut totals: Vec<(String, f64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records {
            let k = key(record);
            match index.get(k) {
                Some(&i) => totals[i].1 += value(record),
                None => {
                    index.insert(k.to_string(), totals.len());
                    totals.push((k.to_string(), value(record)));
                }
            }
        }
        totals
    }

    pub fn total<T, V: Fn(&T) -> f64>(records: &[T], value: V) -> f64 {
        records.iter().map(value).sum()
    }

    /// `part` as a percentage of `whole`; None when `whole` is zero.
    pub fn share_percent(part: f64, whole: f64) -> Option<f64> {
        if whole == 0.0 {
            None
        } else {
            Some(part / whole * 100.0)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_sum_by_keeps_first_seen_order() {
            let records = vec![("b", 1.0), ("a", 2.0), ("b", 3.5), ("c", 0.0), ("a", 1.0)];
            let totals = sum_by(&records, |r| r.0, |r| r.1);
            assert_eq!(
                totals,
                vec![("b".to_string(), 4.5), ("a".to_string(), 3.0), ("c".to_string(), 0.0)]
            );
            assert!(sum_by(&Vec::<(&str, f64)>::new(), |r| r.0, |r| r.1).is_empty());
        }

        #[test]
        fn test_share_percent() {
            assert_eq!(share_percent(25.0, 200.0), Some(12.5));
            assert_eq!(share_percent(5.0, 0.0), None);
            assert_eq!(total(&[1.5, 2.5], |v| *v), 4.0);
        }
    }
}

/// Chart-ready summaries of specific datasets.
pub mod summary {
    use crate::aggregate::{share_percent, sum_by};
    use serde::Serialize;
    use tid_stat::datasets::{RegionVisitors, VisitorShare};
    use tid_stat::dimensions::{WHOLE_COUNTRY_CODE, WHOLE_COUNTRY_NAME};
    use tid_stat::filter::{eq_ignore_case, filter_eq};

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LocationSummary {
        pub location: String,
        pub nights: i64,
        /// Percentage of the whole-country nights, absent for the country
        /// itself.
        pub share_of_country: Option<f64>,
    }

    /// Summarise region-filtered rows: the whole-country row and, when
    /// present, the selected location's row.
    pub fn summarize_location(rows: &[RegionVisitors]) -> Option<LocationSummary> {
        let is_country = |r: &&RegionVisitors| eq_ignore_case(&r.region_id, WHOLE_COUNTRY_CODE);
        let country = rows.iter().find(is_country);
        let region = rows.iter().find(|r| !is_country(r));
        match (country, region) {
            (Some(country), Some(region)) => Some(LocationSummary {
                location: region.region_name.clone(),
                nights: region.nights,
                share_of_country: share_percent(region.nights as f64, country.nights as f64),
            }),
            (Some(country), None) => Some(LocationSummary {
                location: WHOLE_COUNTRY_NAME.to_string(),
                nights: country.nights,
                share_of_country: None,
            }),
            (None, Some(region)) => {
                log::warn!("No whole-country row to compare {} against", region.region_name);
                Some(LocationSummary {
                    location: region.region_name.clone(),
                    nights: region.nights,
                    share_of_country: None,
                })
            }
            (None, None) => None,
        }
    }

    /// How demographic shares are grouped.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Breakdown {
        AgeGroup,
        Gender,
    }

    /// Summed percentages of one trip type per age group or gender.
    pub fn share_totals(shares: &[VisitorShare], trip_type: &str, by: Breakdown) -> Vec<(String, f64)> {
        let selected = filter_eq(shares, |s| s.trip_type.as_str(), trip_type);
        match by {
            Breakdown::AgeGroup => sum_by(&selected, |s| s.age_group.as_str(), |s| s.percentage),
            Breakdown::Gender => sum_by(&selected, |s| s.gender.as_str(), |s| s.percentage),
        }
    }

}
