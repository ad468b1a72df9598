//! Typed views of weather and traffic station snapshots.

use crate::sensor::{StationSnapshot, AIR_TEMPERATURE, PRECIPITATION, SPEED, VOLUME, WIND_SPEED};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Which Digitraffic station API to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFeed {
    Weather,
    Traffic,
}

impl SensorFeed {
    /// Path below the Digitraffic API root.
    pub fn path(&self) -> &'static str {
        match self {
            SensorFeed::Weather => "weather/v1/stations/data",
            SensorFeed::Traffic => "tms/v1/stations/data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub station_id: i64,
    pub measured_time: String,
    pub local_time: NaiveDateTime,
    pub air_temperature: f64,
    pub wind_speed: Option<f64>,
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReading {
    pub station_id: i64,
    pub measured_time: String,
    pub local_time: NaiveDateTime,
    pub volume: Option<f64>,
    pub speed: Option<f64>,
}

impl From<StationSnapshot> for WeatherReading {
    fn from(snapshot: StationSnapshot) -> Self {
        WeatherReading {
            station_id: snapshot.station_id,
            air_temperature: snapshot.reading(AIR_TEMPERATURE).unwrap_or_default(),
            wind_speed: snapshot.reading(WIND_SPEED),
            precipitation: snapshot.reading(PRECIPITATION),
            local_time: snapshot.local_time,
            measured_time: snapshot.measured_time,
        }
    }
}

impl From<StationSnapshot> for TrafficReading {
    fn from(snapshot: StationSnapshot) -> Self {
        TrafficReading {
            station_id: snapshot.station_id,
            volume: snapshot.reading(VOLUME),
            speed: snapshot.reading(SPEED),
            local_time: snapshot.local_time,
            measured_time: snapshot.measured_time,
        }
    }
}
