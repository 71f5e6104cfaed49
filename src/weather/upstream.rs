use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::models::WeatherQueryParams;
use crate::error::WeatherError;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Source of raw provider payloads; one call per cache miss, no retries
#[async_trait]
pub trait WeatherUpstream: Send + Sync {
    /// Fetch the raw current-weather payload
    async fn fetch_current(&self, params: &WeatherQueryParams) -> Result<Value, WeatherError>;

    /// Fetch the raw 3-hour forecast payload covering `days` days
    async fn fetch_forecast(
        &self,
        params: &WeatherQueryParams,
        days: u8,
    ) -> Result<Value, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMapError {
    message: String,
}

/// OpenWeatherMap 2.5 client (`/weather` and `/forecast`)
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_json(
        &self,
        endpoint: &str,
        params: &WeatherQueryParams,
    ) -> Result<Value, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query = params.query_pairs();
        query.push(("appid", self.api_key.clone()));

        tracing::debug!(
            endpoint = %endpoint,
            location = %params.location,
            units = %params.units,
            "Fetching from OpenWeatherMap"
        );

        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        tracing::debug!(status = %status, endpoint = %endpoint, "Received API response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenWeatherMapError>(&text)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(WeatherError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| WeatherError::upstream(format!("response body is not JSON: {e}")))
    }
}

#[async_trait]
impl WeatherUpstream for OpenWeatherClient {
    async fn fetch_current(&self, params: &WeatherQueryParams) -> Result<Value, WeatherError> {
        self.get_json("weather", params).await
    }

    async fn fetch_forecast(
        &self,
        params: &WeatherQueryParams,
        days: u8,
    ) -> Result<Value, WeatherError> {
        let params = params.clone().with_days(days);
        self.get_json("forecast", &params).await
    }
}
