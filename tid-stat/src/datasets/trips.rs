//! Domestic trip tables served in the keyed `json` shape: trips by
//! destination region and season, trips and average length by
//! municipality, and trip-type shares by age group and gender.

use super::cell;
use crate::config::{Host, TableRef};
use crate::decoded::Decoded;
use crate::dimensions::*;
use crate::error::Result;
use crate::keyed::{decode_keyed_response, KeyColumn, KeyedResponse, MeasureSpec};
use crate::query::{QueryBuilder, QueryDocument, ResponseFormat};
use crate::resolver::ResolverRegistry;
use serde::Serialize;

#[cfg(feature = "api")]
use crate::{client, config::ApiConfig};
#[cfg(feature = "api")]
use reqwest::Client;

pub const DESTINATION_TABLE: TableRef = TableRef {
    host: Host::StatFin,
    path: "en/StatFin/smat/statfin_smat_pxt_13mn.px",
};

pub const DURATION_TABLE: TableRef = TableRef {
    host: Host::StatFin,
    path: "en/StatFin/smat/statfin_smat_pxt_13h2.px",
};

pub const DEMOGRAPHICS_TABLE: TableRef = TableRef {
    host: Host::StatFin,
    path: "en/StatFin/smat/statfin_smat_pxt_13yi.px",
};

pub const DESTINATION_REGIONS: [&str; 4] = ["MK01", "MK02", "MK06", "MK19"];
pub const DESTINATION_YEAR: &str = "2021";
pub const LEISURE_PURPOSE: &str = "1";
pub const SEASONS: [&str; 3] = ["1", "2", "3"];
pub const TRIPS: &str = "trips";

pub const DURATION_YEARS: [&str; 4] = ["2021", "2022", "2023", "2024"];
pub const DURATION_MUNICIPALITIES: [&str; 8] = [
    "KU049", "KU091", "KU109", "KU179", "KU564", "KU837", "KU853", "KU905",
];
pub const OVERNIGHT_TRIPS: &str = "yop_matkoja";
pub const AVERAGE_LENGTH: &str = "viipyma";

pub const DEMOGRAPHICS_YEAR: &str = "2023";
pub const AGE_GROUPS: [&str; 3] = ["1", "2", "3"];
pub const GENDERS: [&str; 2] = ["1", "2"];
/// Share indicators, one per trip type.
pub const TRIP_TYPES: [&str; 5] = ["ulkvap_os", "rist_os", "paivam_os", "yopvap_os", "kotvap_os"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationTrips {
    pub destination: String,
    pub season: String,
    pub trips: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDuration {
    pub year: String,
    pub destination: String,
    pub overnight_trips: i64,
    pub average_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorShare {
    pub year: String,
    pub age_group: String,
    pub gender: String,
    pub trip_type: String,
    pub percentage: f64,
}

fn resolved<'a>(registry: &'a ResolverRegistry, dimension: &'a str) -> KeyColumn<'a> {
    match registry.get(dimension) {
        Some(resolver) => KeyColumn::resolved(dimension, resolver),
        None => KeyColumn::raw(dimension),
    }
}

pub fn destination_query() -> QueryDocument {
    QueryBuilder::new()
        .select(DESTINATION_REGION, DESTINATION_REGIONS)
        .select(PURPOSE, [LEISURE_PURPOSE])
        .select(YEAR, [DESTINATION_YEAR])
        .select(SEASON, SEASONS)
        .format(ResponseFormat::Json)
        .build()
}

pub fn destination_trips(response: &KeyedResponse) -> Decoded<DestinationTrips> {
    let registry = ResolverRegistry::builtin();
    let columns = [
        resolved(registry, DESTINATION_REGION),
        KeyColumn::raw(PURPOSE),
        KeyColumn::raw(YEAR),
        resolved(registry, SEASON),
    ];
    decode_keyed_response(response, &columns, &[MeasureSpec::decimal(TRIPS)]).convert(
        |row| -> Result<DestinationTrips> {
            Ok(DestinationTrips {
                destination: cell(&row, DESTINATION_REGION)?.1.to_string(),
                season: cell(&row, SEASON)?.1.to_string(),
                trips: row.value(),
            })
        },
    )
}

pub fn duration_query() -> QueryDocument {
    QueryBuilder::new()
        .select(YEAR, DURATION_YEARS)
        .select(DESTINATION_MUNICIPALITY, DURATION_MUNICIPALITIES)
        .select(INDICATOR, [OVERNIGHT_TRIPS, AVERAGE_LENGTH])
        .format(ResponseFormat::Json)
        .build()
}

pub fn trip_durations(response: &KeyedResponse) -> Decoded<TripDuration> {
    let registry = ResolverRegistry::builtin();
    let columns = [KeyColumn::raw(YEAR), resolved(registry, DESTINATION_MUNICIPALITY)];
    let measures = [
        MeasureSpec::count(OVERNIGHT_TRIPS),
        MeasureSpec::average(AVERAGE_LENGTH),
    ];
    decode_keyed_response(response, &columns, &measures).convert(|row| -> Result<TripDuration> {
        Ok(TripDuration {
            year: cell(&row, YEAR)?.0.to_string(),
            destination: cell(&row, DESTINATION_MUNICIPALITY)?.1.to_string(),
            overnight_trips: row.measure(OVERNIGHT_TRIPS).unwrap_or_default() as i64,
            average_length: row.measure(AVERAGE_LENGTH),
        })
    })
}

pub fn demographics_query() -> QueryDocument {
    QueryBuilder::new()
        .select(YEAR, [DEMOGRAPHICS_YEAR])
        .select(AGE_GROUP, AGE_GROUPS)
        .select(GENDER, GENDERS)
        .select(INDICATOR, TRIP_TYPES)
        .format(ResponseFormat::Json)
        .build()
}

/// One share record per row and trip-type indicator.
pub fn visitor_shares(response: &KeyedResponse) -> Decoded<VisitorShare> {
    let registry = ResolverRegistry::builtin();
    let columns = [
        KeyColumn::raw(YEAR),
        resolved(registry, AGE_GROUP),
        resolved(registry, GENDER),
    ];
    let measures: Vec<MeasureSpec> = TRIP_TYPES.iter().map(|t| MeasureSpec::decimal(*t)).collect();
    let Decoded { records, issues } = decode_keyed_response(response, &columns, &measures);

    let mut shares = Decoded::with_capacity(records.len() * TRIP_TYPES.len());
    shares.issues = issues;
    for row in records {
        let (Ok((year, _)), Ok((_, age_group)), Ok((_, gender))) =
            (cell(&row, YEAR), cell(&row, AGE_GROUP), cell(&row, GENDER))
        else {
            continue;
        };
        for measure in &row.measures {
            shares.push(VisitorShare {
                year: year.to_string(),
                age_group: age_group.to_string(),
                gender: gender.to_string(),
                trip_type: registry.label_or_code(INDICATOR, &measure.name),
                percentage: measure.value.unwrap_or_default(),
            });
        }
    }
    shares
}

#[cfg(feature = "api")]
pub async fn fetch_destination_trips(client: &Client, config: &ApiConfig) -> Result<Decoded<DestinationTrips>> {
    let response = client::fetch_keyed(client, config, &DESTINATION_TABLE, &destination_query()).await?;
    Ok(destination_trips(&response))
}

#[cfg(feature = "api")]
pub async fn fetch_trip_durations(client: &Client, config: &ApiConfig) -> Result<Decoded<TripDuration>> {
    let response = client::fetch_keyed(client, config, &DURATION_TABLE, &duration_query()).await?;
    Ok(trip_durations(&response))
}

#[cfg(feature = "api")]
pub async fn fetch_visitor_shares(client: &Client, config: &ApiConfig) -> Result<Decoded<VisitorShare>> {
    let response = client::fetch_keyed(client, config, &DEMOGRAPHICS_TABLE, &demographics_query()).await?;
    Ok(visitor_shares(&response))
}
