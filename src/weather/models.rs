use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Provider samples are 3 hours apart, so a day holds 8 of them
pub const SAMPLES_PER_DAY: u32 = 8;

// ============================================================================
// Request Models
// ============================================================================

/// Measurement system the provider reports in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(format!(
                "unsupported units '{other}', expected metric or imperial"
            )),
        }
    }
}

/// Where to look up weather: a coordinate pair or a free-text city name
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl LocationQuery {
    /// Provider query parameters identifying this location
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            LocationQuery::City(city) => vec![("q", city.clone())],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
            LocationQuery::City(city) => f.write_str(city),
        }
    }
}

/// Normalized request handed to the upstream client
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQueryParams {
    pub units: Units,
    pub location: LocationQuery,
    /// Number of 3-hour samples to request (forecasts only)
    pub sample_count: Option<u32>,
}

impl WeatherQueryParams {
    pub fn new(location: LocationQuery, units: Units) -> Self {
        Self {
            units,
            location,
            sample_count: None,
        }
    }

    /// Request enough samples to cover `days` calendar days
    pub fn with_days(mut self, days: u8) -> Self {
        self.sample_count = Some(u32::from(days) * SAMPLES_PER_DAY);
        self
    }

    /// Provider query parameters, excluding the API key
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("units", self.units.as_str().to_string()),
            ("lang", "en".to_string()),
        ];
        pairs.extend(self.location.query_pairs());
        if let Some(count) = self.sample_count {
            pairs.push(("cnt", count.to_string()));
        }
        pairs
    }
}

// ============================================================================
// API Response Models (what we return to clients and keep in the cache)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalized current conditions, in the units the caller asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeather {
    pub location: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: Option<f64>,
    pub clouds: u32,
    pub visibility: Option<u32>,
    pub condition_id: u32,
    pub description: String,
    pub icon: String,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    /// Shift in seconds from UTC
    pub timezone_offset: i32,
    /// Observation time, unix seconds
    pub observed_at: i64,
}

/// One calendar day summarized from the provider's 3-hour samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastDay {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Most frequent condition label of the day, e.g. "Rain"
    pub condition: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub timezone_offset: i32,
    /// Chronological, at most the requested number of days
    pub days: Vec<ForecastDay>,
}

// ============================================================================
// OpenWeatherMap 2.5 payloads (Internal)
// Every field is optional here; the normalizer decides which ones are
// required and what the rest default to.
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RawCurrent {
    pub coord: Option<RawCoord>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub main: Option<RawMain>,
    pub visibility: Option<u32>,
    pub wind: Option<RawWind>,
    pub clouds: Option<RawClouds>,
    pub dt: Option<i64>,
    pub sys: Option<RawSys>,
    pub timezone: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCoord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub id: Option<u32>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<u32>,
    pub humidity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawClouds {
    pub all: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawForecast {
    pub city: Option<RawCity>,
    #[serde(default)]
    pub list: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct RawSample {
    pub dt: Option<i64>,
    /// Provider-formatted "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: Option<String>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
}
