use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::weather::models::Units;
use crate::weather::upstream::DEFAULT_BASE_URL;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// OpenWeatherMap data API root (the `/weather` and `/forecast` parent)
    #[serde(default = "default_base_url")]
    pub openweathermap_base_url: String,

    /// Units used when a request doesn't specify any
    #[serde(default)]
    pub units: Units,

    /// API key clients must send as `X-API-Key` (optional - if not set, no auth required)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Timeout for a single provider request
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Entry count at which the weather cache starts sweeping expired entries
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_cache_max_entries() -> usize {
    10_000
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", Units::default().as_str())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHER_PROXY_)
            .add_source(
                Environment::with_prefix("WEATHER_PROXY")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_settings() {
        let config: AppConfig = Config::builder()
            .set_override("openweathermap_api_key", "secret")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.openweathermap_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.units, Units::Metric);
        assert_eq!(config.api_key, None);
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn test_units_read_from_source() {
        let config: AppConfig = Config::builder()
            .set_override("openweathermap_api_key", "secret")
            .unwrap()
            .set_override("units", "imperial")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.units, Units::Imperial);
    }

    #[test]
    fn test_api_key_is_required() {
        let result: Result<AppConfig, _> = Config::builder().build().unwrap().try_deserialize();
        assert!(result.is_err());
    }
}
