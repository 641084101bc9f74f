use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One station's measurements for a single observation interval.
///
/// Every field is required; a record only exists once all four timestamps
/// and all numeric measurements decoded successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Station identifier (`domain_meteosiId`).
    pub station_id: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Inclusive start of the observation interval (`validStart`).
    pub interval_start: DateTime<Utc>,
    /// End of the observation interval (`validEnd`).
    pub interval_end: DateTime<Utc>,
    /// Dew point temperature in °C.
    pub temperature_dew_point: f64,
    /// Average air temperature in °C.
    pub temperature_air_avg: f64,
    pub temperature_air_max: f64,
    pub temperature_air_min: f64,
    /// Average relative humidity in %.
    pub humidity_relative_avg: f64,
    /// Average wind direction in degrees.
    pub wind_direction_avg: f64,
    pub wind_direction_max_gust: f64,
    /// Average wind speed in m/s.
    pub wind_speed_avg: f64,
    pub wind_speed_max: f64,
    /// Average pressure reduced to mean sea level in hPa.
    pub pressure_mean_sea_level_avg: f64,
    pub pressure_surface_level_avg: f64,
    /// Precipitation in mm.
    pub precipitation_sum_10min: f64,
    pub precipitation_sum_1h: f64,
    pub precipitation_sum_24h: f64,
    /// Snow cover height in cm.
    pub snow_cover_height: f64,
    /// Global and diffuse solar radiation in W/m².
    pub sun_radiation_global_avg: f64,
    pub sun_radiation_diffuse_avg: f64,
    /// Horizontal visibility in km.
    pub visibility: f64,
}

impl ObservationRecord {
    /// The deduplication key of this record.
    pub fn key(&self) -> IngestionKey {
        IngestionKey::new(&self.station_id, self.interval_start)
    }
}

/// Identity of an observation: the station plus the start of its interval.
///
/// Two records with the same key describe the same observation; the later
/// one wins when both are accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngestionKey {
    pub station_id: String,
    pub interval_start: DateTime<Utc>,
}

impl IngestionKey {
    pub fn new(station_id: &str, interval_start: DateTime<Utc>) -> Self {
        Self {
            station_id: station_id.to_string(),
            interval_start,
        }
    }
}

/// Renders as `"{station}-{interval_start}"` with the instant in RFC 3339 UTC.
impl fmt::Display for IngestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.station_id,
            self.interval_start
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}
