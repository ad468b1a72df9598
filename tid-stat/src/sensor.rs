//! Decoding of Digitraffic station payloads into per-station snapshots.
//!
//! Both the road-weather and the TMS (traffic measurement) APIs serve
//! `{stations: [{id, sensorValues: [{name, value, measuredTime}]}]}`. A
//! [`SensorSelection`] picks the sensors of interest and names the fields
//! they land in.

use crate::decoded::{Decoded, IssueKind};
use crate::error::Result;
use crate::time_range::TimeRange;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const AIR_TEMPERATURE: &str = "air_temperature";
pub const WIND_SPEED: &str = "wind_speed";
pub const PRECIPITATION: &str = "precipitation";
pub const VOLUME: &str = "volume";
pub const SPEED: &str = "speed";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsPayload {
    #[serde(default)]
    pub data_updated_time: Option<String>,
    #[serde(default)]
    pub stations: Option<Vec<StationData>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationData {
    pub id: i64,
    #[serde(default)]
    pub sensor_values: Option<Vec<SensorValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorValue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub measured_time: Option<String>,
}

impl StationsPayload {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Where a snapshot's timestamp comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// The `measuredTime` of the last sensor scanned, matched or not.
    #[default]
    LastScanned,
    /// The `measuredTime` of the sensor feeding this field.
    Sensor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SensorSelection {
    fields: HashMap<String, String>,
    required: Option<String>,
    timestamp: TimestampPolicy,
}

impl SensorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the sensor called `sensor_name` to `field`.
    pub fn sensor(mut self, sensor_name: &str, field: &str) -> Self {
        self.fields.insert(sensor_name.to_string(), field.to_string());
        self
    }

    /// Drop stations that lack a reading for `field`.
    pub fn require(mut self, field: &str) -> Self {
        self.required = Some(field.to_string());
        self
    }

    pub fn timestamp(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp = policy;
        self
    }

    /// Air temperature (required), average wind speed and precipitation.
    pub fn weather() -> Self {
        Self::new()
            .sensor("ILMA", AIR_TEMPERATURE)
            .sensor("KESKITUULI", WIND_SPEED)
            .sensor("SADE", PRECIPITATION)
            .require(AIR_TEMPERATURE)
    }

    /// Hourly vehicle count and average speed in direction 1.
    pub fn traffic() -> Self {
        Self::new()
            .sensor("OHITUKSET_60MIN_KIINTEA_SUUNTA1", VOLUME)
            .sensor("NOPEUS_KIINTEA_SUUNTA1", SPEED)
    }

    pub fn field_for(&self, sensor_name: &str) -> Option<&str> {
        self.fields.get(sensor_name).map(String::as_str)
    }
}

/// The selected readings of one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub station_id: i64,
    /// `measuredTime` exactly as served.
    pub measured_time: String,
    pub local_time: NaiveDateTime,
    pub readings: BTreeMap<String, f64>,
}

impl StationSnapshot {
    pub fn reading(&self, field: &str) -> Option<f64> {
        self.readings.get(field).copied()
    }
}

/// Decode with timestamps converted to the system time zone.
pub fn decode_stations(
    payload: &StationsPayload,
    wanted_ids: &HashSet<i64>,
    selection: &SensorSelection,
    range: &TimeRange,
) -> Decoded<StationSnapshot> {
    decode_stations_in(payload, wanted_ids, selection, range, &Local)
}

/// Decode with timestamps converted to `zone`. An empty `wanted_ids` keeps
/// every station.
pub fn decode_stations_in<Tz: TimeZone>(
    payload: &StationsPayload,
    wanted_ids: &HashSet<i64>,
    selection: &SensorSelection,
    range: &TimeRange,
    zone: &Tz,
) -> Decoded<StationSnapshot> {
    let Some(stations) = payload.stations.as_ref() else {
        warn!("No stations data found");
        return Decoded::empty_with(IssueKind::MissingData, "payload has no stations array");
    };

    let mut decoded = Decoded::new();
    for station in stations {
        if !wanted_ids.is_empty() && !wanted_ids.contains(&station.id) {
            continue;
        }
        let Some(sensors) = station.sensor_values.as_ref() else {
            debug!("Station {} has no sensor values", station.id);
            continue;
        };

        let mut readings = BTreeMap::new();
        let mut last_scanned: Option<&str> = None;
        let mut field_times: HashMap<&str, &str> = HashMap::new();
        for sensor in sensors {
            if let Some(time) = sensor.measured_time.as_deref() {
                last_scanned = Some(time);
            }
            let field = sensor.name.as_deref().and_then(|name| selection.field_for(name));
            if let (Some(field), Some(value)) = (field, sensor.value) {
                readings.insert(field.to_string(), value);
                if let Some(time) = sensor.measured_time.as_deref() {
                    field_times.insert(field, time);
                }
            }
        }

        if readings.is_empty() {
            continue;
        }
        if let Some(required) = selection.required.as_deref() {
            if !readings.contains_key(required) {
                continue;
            }
        }

        let measured_time = match &selection.timestamp {
            TimestampPolicy::LastScanned => last_scanned,
            TimestampPolicy::Sensor(field) => field_times.get(field.as_str()).copied(),
        };
        let Some(measured_time) = measured_time else {
            warn!("Station {} has no measurement time", station.id);
            decoded.note(
                IssueKind::MissingTimestamp,
                format!("station {}: no measuredTime", station.id),
            );
            continue;
        };
        let local_time = match DateTime::parse_from_rfc3339(measured_time) {
            Ok(instant) => instant.with_timezone(zone).naive_local(),
            Err(e) => {
                warn!(
                    "Error parsing date for station {}: {} ({})",
                    station.id, measured_time, e
                );
                decoded.note(
                    IssueKind::UnparseableTimestamp,
                    format!("station {}: {:?}", station.id, measured_time),
                );
                continue;
            }
        };
        if !range.contains(&local_time) {
            continue;
        }

        decoded.push(StationSnapshot {
            station_id: station.id,
            measured_time: measured_time.to_string(),
            local_time,
            readings,
        });
    }
    debug!("Decoded {} station snapshots", decoded.len());
    decoded
}

/// Every station id in payload order.
pub fn station_ids(payload: &StationsPayload) -> Vec<i64> {
    payload
        .stations
        .as_ref()
        .map(|stations| stations.iter().map(|s| s.id).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    static WEATHER: &str = include_str!("../../fixtures/weather_stations.json");
    static TRAFFIC: &str = include_str!("../../fixtures/traffic_stations.json");

    fn december_first() -> TimeRange {
        let day = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        TimeRange::from_dates(day, day)
    }

    fn ids(decoded: &Decoded<StationSnapshot>) -> Vec<i64> {
        decoded.records.iter().map(|s| s.station_id).collect()
    }

    #[test]
    fn test_weather_preset() {
        let payload = StationsPayload::parse(WEATHER).unwrap();
        let decoded = decode_stations_in(
            &payload,
            &HashSet::new(),
            &SensorSelection::weather(),
            &december_first(),
            &Utc,
        );
        // 1002 unmapped, 1003 out of range, 1004 no sensors, 1005 bad time,
        // 1006 missing the required temperature
        assert_eq!(ids(&decoded), vec![1001]);
        let snapshot = &decoded.records[0];
        assert_eq!(snapshot.reading(AIR_TEMPERATURE), Some(-3.2));
        assert_eq!(snapshot.reading(WIND_SPEED), Some(4.1));
        assert_eq!(snapshot.reading(PRECIPITATION), Some(0.0));
        assert!(decoded.has_issue(IssueKind::UnparseableTimestamp));
        assert_eq!(decoded.issues.len(), 1);
    }

    #[test]
    fn test_last_scanned_timestamp_by_default() {
        let payload = StationsPayload::parse(WEATHER).unwrap();
        let decoded = decode_stations_in(
            &payload,
            &HashSet::from([1001]),
            &SensorSelection::weather(),
            &december_first(),
            &Utc,
        );
        assert_eq!(decoded.records[0].measured_time, "2024-12-01T10:00:00Z");
        assert_eq!(decoded.records[0].local_time.to_string(), "2024-12-01 10:00:00");
    }

    #[test]
    fn test_sensor_timestamp_policy() {
        let payload = StationsPayload::parse(WEATHER).unwrap();
        let selection = SensorSelection::weather().timestamp(TimestampPolicy::Sensor(AIR_TEMPERATURE.into()));
        let decoded = decode_stations_in(&payload, &HashSet::from([1001]), &selection, &december_first(), &Utc);
        assert_eq!(decoded.records[0].measured_time, "2024-12-01T09:50:00Z");
    }

    #[test]
    fn test_unmapped_station_excluded_others_kept() {
        let payload = StationsPayload::parse(WEATHER).unwrap();
        let decoded = decode_stations_in(
            &payload,
            &HashSet::from([1001, 1002]),
            &SensorSelection::weather(),
            &TimeRange::unbounded(),
            &Utc,
        );
        assert_eq!(ids(&decoded), vec![1001]);
    }

    #[test]
    fn test_traffic_preset_and_range_edge() {
        let payload = StationsPayload::parse(TRAFFIC).unwrap();
        let decoded = decode_stations_in(
            &payload,
            &HashSet::new(),
            &SensorSelection::traffic(),
            &december_first(),
            &Utc,
        );
        // 23002 sits on the last second of the range; 23003 has only
        // unselected sensors
        assert_eq!(ids(&decoded), vec![23001, 23002]);
        assert_eq!(decoded.records[0].reading(VOLUME), Some(412.0));
        assert_eq!(decoded.records[0].reading(SPEED), Some(87.0));
        assert_eq!(decoded.records[1].reading(VOLUME), None);
        assert!(!decoded.is_degraded());
    }

    #[test]
    fn test_conversion_to_zone_moves_the_window() {
        let payload = StationsPayload::parse(TRAFFIC).unwrap();
        let helsinki = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let decoded = decode_stations_in(
            &payload,
            &HashSet::new(),
            &SensorSelection::traffic(),
            &december_first(),
            &helsinki,
        );
        // 23:59:59Z is already 2 December at UTC+2
        assert_eq!(ids(&decoded), vec![23001]);
        assert_eq!(decoded.records[0].local_time.to_string(), "2024-12-01 11:00:00");
    }

    #[test]
    fn test_station_ids_and_missing_array() {
        let payload = StationsPayload::parse(TRAFFIC).unwrap();
        assert_eq!(station_ids(&payload), vec![23001, 23002, 23003]);
        let empty = StationsPayload::parse("{}").unwrap();
        assert!(station_ids(&empty).is_empty());
        let decoded = decode_stations(&empty, &HashSet::new(), &SensorSelection::traffic(), &TimeRange::unbounded());
        assert!(decoded.has_issue(IssueKind::MissingData));
    }
}
