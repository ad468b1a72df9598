//! Foreign visitor tables: nights by destination municipality, trips by
//! purpose, and the yearly series for one location.

use super::cell;
use crate::config::{Host, TableRef};
use crate::decoded::Decoded;
use crate::dimensions::*;
use crate::error::Result;
use crate::filter::eq_ignore_case;
use crate::json_stat::{decode_in_response_order_with, DimensionedResponse};
use crate::query::{build_query, QueryDocument};
use crate::resolver::ResolverRegistry;
use serde::Serialize;

#[cfg(feature = "api")]
use crate::{client, config::ApiConfig};
#[cfg(feature = "api")]
use reqwest::Client;

/// Nights spent by foreign tourists, by destination municipality.
pub const REGION_TABLE: TableRef = TableRef {
    host: Host::StatFin,
    path: "en/StatFin_Passiivi/smat/statfinpas_smat_pxt_133i_2021.px",
};

/// Visit Finland travel meter, trips by purpose.
pub const PURPOSE_TABLE: TableRef = TableRef {
    host: Host::VisitFinland,
    path: "fi/VisitFinland/Matkailijamittari/visitfinland_ulma_pxt_14tj.px",
};

pub const REGION_YEAR: &str = "2021";
pub const ALL_ACCOMMODATION: &str = "0";
pub const NIGHTS: &str = "yot";
pub const TRIPS_ROLLING_12M: &str = "matkoja_r12";
pub const ALL_PURPOSES: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];
/// Personal and work trips.
pub const MAIN_PURPOSES: &str = "1,6";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionVisitors {
    pub region_id: String,
    pub region_name: String,
    pub nights: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurposeVisitors {
    pub purpose_id: String,
    pub purpose: String,
    pub trips: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyVisitors {
    pub year: String,
    pub nights: i64,
}

pub fn region_query() -> QueryDocument {
    build_query([
        (ACCOMMODATION, vec![ALL_ACCOMMODATION]),
        (YEAR, vec![REGION_YEAR]),
        (INDICATOR, vec![NIGHTS]),
    ])
}

pub fn region_visitors(response: &DimensionedResponse) -> Decoded<RegionVisitors> {
    decode_in_response_order_with(response, ResolverRegistry::builtin()).convert(|row| -> Result<RegionVisitors> {
        let (code, label) = cell(&row, DESTINATION_MUNICIPALITY)?;
        Ok(RegionVisitors {
            region_id: code.to_string(),
            region_name: label.to_string(),
            nights: row.value() as i64,
        })
    })
}

/// Code of the municipality called `name`; the last match wins.
pub fn region_code_for<'a>(rows: &'a [RegionVisitors], name: &str) -> Option<&'a str> {
    rows.iter()
        .rev()
        .find(|r| eq_ignore_case(&r.region_name, name))
        .map(|r| r.region_id.as_str())
}

pub fn purpose_query() -> QueryDocument {
    build_query([
        (PURPOSE, ALL_PURPOSES.to_vec()),
        (DURATION, vec!["0"]),
        (TRANSPORT, vec!["0"]),
        (COUNTRY_OF_RESIDENCE, vec![WHOLE_COUNTRY_CODE]),
        (INDICATOR, vec![TRIPS_ROLLING_12M]),
    ])
}

pub fn purpose_visitors(response: &DimensionedResponse) -> Decoded<PurposeVisitors> {
    decode_in_response_order_with(response, ResolverRegistry::builtin()).convert(|row| -> Result<PurposeVisitors> {
        let (code, label) = cell(&row, PURPOSE)?;
        Ok(PurposeVisitors {
            purpose_id: code.to_string(),
            purpose: label.to_string(),
            trips: row.value() as i64,
        })
    })
}

/// The municipality code to query; no location, an empty one, or the
/// whole country all mean [`WHOLE_COUNTRY_CODE`].
pub fn location_or_country(location: Option<&str>) -> &str {
    match location.map(str::trim) {
        None | Some("") | Some(WHOLE_COUNTRY_NAME) => WHOLE_COUNTRY_CODE,
        Some(code) => code,
    }
}

pub fn yearly_query(location: Option<&str>) -> QueryDocument {
    build_query([
        (ACCOMMODATION, vec![ALL_ACCOMMODATION]),
        (DESTINATION_MUNICIPALITY, vec![location_or_country(location)]),
        (INDICATOR, vec![NIGHTS]),
    ])
}

pub fn yearly_visitors(response: &DimensionedResponse) -> Decoded<YearlyVisitors> {
    decode_in_response_order_with(response, ResolverRegistry::builtin()).convert(|row| -> Result<YearlyVisitors> {
        let (_, label) = cell(&row, YEAR)?;
        Ok(YearlyVisitors {
            year: label.to_string(),
            nights: row.value() as i64,
        })
    })
}

#[cfg(feature = "api")]
pub async fn fetch_region_visitors(client: &Client, config: &ApiConfig) -> Result<Decoded<RegionVisitors>> {
    let response = client::fetch_dimensioned(client, config, &REGION_TABLE, &region_query()).await?;
    Ok(region_visitors(&response))
}

#[cfg(feature = "api")]
pub async fn fetch_purpose_visitors(client: &Client, config: &ApiConfig) -> Result<Decoded<PurposeVisitors>> {
    let response = client::fetch_dimensioned(client, config, &PURPOSE_TABLE, &purpose_query()).await?;
    Ok(purpose_visitors(&response))
}

#[cfg(feature = "api")]
pub async fn fetch_yearly_visitors(
    client: &Client,
    config: &ApiConfig,
    location: Option<&str>,
) -> Result<Decoded<YearlyVisitors>> {
    let response = client::fetch_dimensioned(client, config, &REGION_TABLE, &yearly_query(location)).await?;
    Ok(yearly_visitors(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_any_of, filter_region};

    fn parse(body: &str) -> DimensionedResponse {
        DimensionedResponse::parse(body).unwrap()
    }

    #[test]
    fn test_region_visitors_and_filter() {
        let decoded = region_visitors(&parse(include_str!("../../../fixtures/visitors_by_region.json")));
        assert_eq!(decoded.len(), 5);
        let rows = filter_region(
            &decoded.records,
            |r| r.region_id.as_str(),
            |r| r.region_name.as_str(),
            Some("Tampere"),
        );
        let codes: Vec<&str> = rows.iter().map(|r| r.region_id.as_str()).collect();
        assert_eq!(codes, vec!["SSS", "KU837"]);
        assert_eq!(rows[0].nights, 25_104_332);
        assert_eq!(rows[1].nights, 1_502_330);
    }

    #[test]
    fn test_region_code_lookup() {
        let decoded = region_visitors(&parse(include_str!("../../../fixtures/visitors_by_region.json")));
        assert_eq!(region_code_for(&decoded.records, "turku"), Some("KU853"));
        assert_eq!(region_code_for(&decoded.records, "Oulu"), None);
    }

    #[test]
    fn test_purposes_get_english_labels() {
        let decoded = purpose_visitors(&parse(include_str!("../../../fixtures/visitors_by_purpose.json")));
        let main = filter_any_of(&decoded.records, |p| p.purpose_id.as_str(), MAIN_PURPOSES);
        let names: Vec<&str> = main.iter().map(|p| p.purpose.as_str()).collect();
        assert_eq!(names, vec!["Personal", "Work"]);
        assert_eq!(main[1].trips, 1_890_123);
    }

    #[test]
    fn test_yearly_series_in_index_order() {
        let decoded = yearly_visitors(&parse(include_str!("../../../fixtures/visitors_by_year.json")));
        let years: Vec<&str> = decoded.records.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2019", "2020", "2021"]);
        assert_eq!(decoded.records[1].nights, 1_208_431);
    }

    #[test]
    fn test_location_defaults_to_country() {
        assert_eq!(location_or_country(None), "SSS");
        assert_eq!(location_or_country(Some(" ")), "SSS");
        assert_eq!(location_or_country(Some("Finland")), "SSS");
        assert_eq!(location_or_country(Some("KU837")), "KU837");
        let query = yearly_query(Some("KU091"));
        assert_eq!(query.selections()[1], (DESTINATION_MUNICIPALITY, &["KU091".to_string()][..]));
    }

    #[test]
    fn test_purpose_query_selects_all_purposes() {
        let query = purpose_query();
        let selections = query.selections();
        assert_eq!(selections[0].0, PURPOSE);
        assert_eq!(selections[0].1.len(), 10);
        assert_eq!(selections[3].1, &["SSS".to_string()][..]);
    }
}
