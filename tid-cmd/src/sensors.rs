//! Road weather and traffic station subcommands.

use crate::{or_empty, Context, Feed, SensorArgs};
use chrono::{Local, NaiveDate};
use log::{error, info};
use serde::Serialize;
use std::collections::HashSet;
use tid_prefs::{keys, PreferenceExt, PreferenceStore};
use tid_stat::client::fetch_stations;
use tid_stat::sensor::{decode_stations, station_ids, SensorSelection, StationsPayload};
use tid_stat::stations::{SensorFeed, TrafficReading, WeatherReading};
use tid_stat::time_range::TimeRange;
use tid_utils::dates::{default_window, parse_date};

/// Station id meaning "no station chosen".
const NO_STATION: i64 = 0;

#[derive(Debug, Serialize)]
struct StationRow {
    feed: &'static str,
    station_id: i64,
}

/// Stations and time window to show. Given stations and start date are
/// saved; missing ones come from preferences, then from the default window
/// of yesterday through today. No stations selected means all of them.
pub fn sensor_selection(
    prefs: &dyn PreferenceStore,
    args: &SensorArgs,
    location_key: &str,
    date_key: &str,
    today: NaiveDate,
) -> anyhow::Result<(HashSet<i64>, TimeRange)> {
    let ids = if args.stations.is_empty() {
        prefs.get_station_ids(location_key, keys::DEFAULT_STATION)?
    } else {
        prefs.put_station_ids(location_key, &args.stations)?;
        args.stations.clone()
    };

    let (yesterday, today) = default_window(&today);
    let from = match &args.from {
        Some(s) => {
            let date = parse_date(s)?;
            prefs.put_date(date_key, &date)?;
            date
        }
        None => prefs.get_date(date_key, yesterday)?,
    };
    let to = match &args.to {
        Some(s) => parse_date(s)?,
        None => today,
    };
    if from > to {
        info!("Window {} to {} is empty", from, to);
    }

    let wanted = ids.into_iter().filter(|&id| id != NO_STATION).collect();
    Ok((wanted, TimeRange::from_dates(from, to)))
}

pub async fn run_weather(ctx: &Context<'_>, args: &SensorArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let (ids, range) = sensor_selection(ctx.prefs, args, keys::WEATHER_LOCATION, keys::WEATHER_DATE, today)?;
    let result = fetch_stations(&ctx.client, &ctx.config, SensorFeed::Weather)
        .await
        .map(|payload| {
            decode_stations(&payload, &ids, &SensorSelection::weather(), &range).map(WeatherReading::from)
        });
    ctx.output.write(&or_empty("weather stations", result))
}

pub async fn run_traffic(ctx: &Context<'_>, args: &SensorArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let (ids, range) = sensor_selection(ctx.prefs, args, keys::TRAFFIC_LOCATION, keys::TRAFFIC_DATE, today)?;
    let result = fetch_stations(&ctx.client, &ctx.config, SensorFeed::Traffic)
        .await
        .map(|payload| {
            decode_stations(&payload, &ids, &SensorSelection::traffic(), &range).map(TrafficReading::from)
        });
    ctx.output.write(&or_empty("traffic stations", result))
}

fn station_rows(feed: &'static str, result: tid_stat::Result<StationsPayload>) -> Vec<StationRow> {
    match result {
        Ok(payload) => station_ids(&payload)
            .into_iter()
            .map(|station_id| StationRow { feed, station_id })
            .collect(),
        Err(e) => {
            error!("Failed to fetch {} stations: {}", feed, e);
            Vec::new()
        }
    }
}

pub async fn run_stations(ctx: &Context<'_>, feed: Option<Feed>) -> anyhow::Result<()> {
    let fetch = |feed: SensorFeed| fetch_stations(&ctx.client, &ctx.config, feed);
    let rows = match feed {
        Some(Feed::Weather) => station_rows("weather", fetch(SensorFeed::Weather).await),
        Some(Feed::Traffic) => station_rows("traffic", fetch(SensorFeed::Traffic).await),
        None => {
            let (weather, traffic) = tokio::join!(fetch(SensorFeed::Weather), fetch(SensorFeed::Traffic));
            let mut rows = station_rows("weather", weather);
            rows.extend(station_rows("traffic", traffic));
            rows
        }
    };
    ctx.output.write(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tid_prefs::MemoryStore;
    use tid_utils::dates::{end_of_day, start_of_day};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_to_all_stations_since_yesterday() {
        let prefs = MemoryStore::new();
        let (ids, range) = sensor_selection(
            &prefs,
            &SensorArgs::default(),
            keys::WEATHER_LOCATION,
            keys::WEATHER_DATE,
            day(2024, 12, 2),
        )
        .unwrap();
        assert!(ids.is_empty());
        assert_eq!(range, TimeRange(start_of_day(&day(2024, 12, 1)), end_of_day(&day(2024, 12, 2))));
    }

    #[test]
    fn test_given_selection_is_saved() {
        let prefs = MemoryStore::new();
        let args = SensorArgs {
            stations: vec![1001, 1012],
            from: Some("2024-11-20".to_string()),
            to: Some("2024-11-21".to_string()),
        };
        let (ids, range) =
            sensor_selection(&prefs, &args, keys::TRAFFIC_LOCATION, keys::TRAFFIC_DATE, day(2024, 12, 2)).unwrap();
        assert_eq!(ids, HashSet::from([1001, 1012]));
        assert_eq!(range.0, start_of_day(&day(2024, 11, 20)));

        let (ids, range) = sensor_selection(
            &prefs,
            &SensorArgs::default(),
            keys::TRAFFIC_LOCATION,
            keys::TRAFFIC_DATE,
            day(2024, 12, 2),
        )
        .unwrap();
        assert_eq!(ids, HashSet::from([1001, 1012]));
        assert_eq!(range, TimeRange(start_of_day(&day(2024, 11, 20)), end_of_day(&day(2024, 12, 2))));
    }

    #[test]
    fn test_saved_ids_in_bracket_form() {
        let prefs = MemoryStore::new();
        prefs.put(keys::WEATHER_LOCATION, "[0, 1006]").unwrap();
        let (ids, _) = sensor_selection(
            &prefs,
            &SensorArgs::default(),
            keys::WEATHER_LOCATION,
            keys::WEATHER_DATE,
            day(2024, 12, 2),
        )
        .unwrap();
        assert_eq!(ids, HashSet::from([1006]));
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let prefs = MemoryStore::new();
        let args = SensorArgs {
            from: Some("yesterday".to_string()),
            ..SensorArgs::default()
        };
        assert!(sensor_selection(&prefs, &args, keys::WEATHER_LOCATION, keys::WEATHER_DATE, day(2024, 12, 2)).is_err());
    }

    #[test]
    fn test_station_rows() {
        let payload = StationsPayload::parse(include_str!("../../fixtures/traffic_stations.json")).unwrap();
        let rows = station_rows("traffic", Ok(payload));
        assert_eq!(rows.iter().map(|r| r.station_id).collect::<Vec<_>>(), vec![23001, 23002, 23003]);
        assert!(station_rows("traffic", Err(tid_stat::StatError::Status(503))).is_empty());
    }
}
