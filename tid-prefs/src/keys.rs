//! Preference keys and their defaults.

pub const SELECTED_LOCATION: &str = "selectedLocation";
pub const SELECTED_LOCATION_CODE: &str = "selectedLocationCode";
pub const SEASON: &str = "season";
pub const TRIP_TYPE: &str = "tripType";
pub const YEAR: &str = "year";
pub const WEATHER_LOCATION: &str = "weather_location";
pub const WEATHER_DATE: &str = "weather_date";
pub const TRAFFIC_LOCATION: &str = "traffic_location";
pub const TRAFFIC_DATE: &str = "traffic_date";
pub const PRODUCTS: &str = "products";
pub const REGIONS: &str = "regions";
pub const YEARS: &str = "years";
pub const TYPES: &str = "types";

pub const DEFAULT_LOCATION: &str = "Finland";
pub const DEFAULT_SEASON: &str = "Spring";
pub const DEFAULT_TRIP_TYPE: &str = "Leisure Trip Abroad";
pub const DEFAULT_YEAR: &str = "2024";
/// Station id meaning "no station chosen yet".
pub const DEFAULT_STATION: &str = "0";
