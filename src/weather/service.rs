use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::key::{build_key, Operation};
use super::location::resolve;
use super::models::*;
use super::normalize::{normalize_current, normalize_forecast};
use super::upstream::WeatherUpstream;
use crate::cache::CacheStore;
use crate::error::WeatherError;

/// Current conditions are cached for 1 hour
pub const CURRENT_WEATHER_TTL: Duration = Duration::from_secs(60 * 60);

/// Forecasts are cached for 3 hours
pub const FORECAST_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Day count used when the caller does not ask for one
pub const DEFAULT_FORECAST_DAYS: u8 = 5;

/// Cache-aside front for the weather provider.
///
/// A hit returns the stored record. A miss fetches, normalizes and stores the
/// result; failures are returned as-is and never cached. There is no per-key
/// lock, so concurrent misses on the same key may each call the provider.
/// Both writes carry the same recomputed value, so the last one simply wins.
pub struct WeatherService {
    upstream: Arc<dyn WeatherUpstream>,
    cache: Arc<dyn CacheStore>,
}

impl WeatherService {
    pub fn new(upstream: Arc<dyn WeatherUpstream>, cache: Arc<dyn CacheStore>) -> Self {
        Self { upstream, cache }
    }

    pub async fn get_current_weather(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        city: Option<&str>,
        units: Units,
    ) -> Result<CurrentWeather, WeatherError> {
        let location = resolve(lat, lon, city)?;
        let key = build_key(Operation::Current, &location, units, None);
        let params = WeatherQueryParams::new(location, units);

        let upstream = &self.upstream;
        self.cached(&key, CURRENT_WEATHER_TTL, move || async move {
            let raw = upstream.fetch_current(&params).await?;
            normalize_current(raw)
        })
        .await
    }

    pub async fn get_weather_forecast(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        city: Option<&str>,
        days: Option<u8>,
        units: Units,
    ) -> Result<Forecast, WeatherError> {
        let days = days.unwrap_or(DEFAULT_FORECAST_DAYS);
        let location = resolve(lat, lon, city)?;
        let key = build_key(Operation::Forecast, &location, units, Some(days));
        let params = WeatherQueryParams::new(location, units);

        let upstream = &self.upstream;
        self.cached(&key, FORECAST_TTL, move || async move {
            let raw = upstream.fetch_forecast(&params, days).await?;
            normalize_forecast(raw, days)
        })
        .await
    }

    async fn cached<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T, WeatherError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, WeatherError>>,
    {
        if let Some(stored) = self.cache.get(key).await {
            match serde_json::from_str(&stored) {
                Ok(value) => {
                    tracing::debug!(key = %key, "Weather cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                }
            }
        } else {
            tracing::debug!(key = %key, "Weather cache miss");
        }

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(serialized) => {
                self.cache.set(key, serialized, ttl).await;
                tracing::info!(key = %key, ttl_secs = ttl.as_secs(), "Weather data cached");
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not serialize record for cache");
            }
        }

        Ok(value)
    }
}
