use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::{CurrentWeather, Forecast};
use crate::error::WeatherError;
use crate::extractors::ValidatedQuery;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current conditions for a coordinate pair or city
///
/// GET /api/v1/weather/current?city=London&units=metric
#[utoipa::path(
    get,
    path = "/api/v1/weather/current",
    tag = "weather",
    params(
        ("lat" = Option<f64>, Query, description = "Latitude, requires lon"),
        ("lon" = Option<f64>, Query, description = "Longitude, requires lat"),
        ("city" = Option<String>, Query, description = "City name, instead of lat/lon"),
        ("units" = Option<String>, Query, description = "metric or imperial"),
    ),
    responses(
        (status = 200, body = CurrentWeather),
        (status = 400, body = crate::error::ErrorResponse),
        (status = 502, body = crate::error::ErrorResponse),
    )
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    query: ValidatedQuery,
) -> Result<Json<CurrentWeather>, WeatherError> {
    let units = query.units.unwrap_or(state.config.units);

    let weather = state
        .weather_service
        .get_current_weather(query.lat, query.lon, query.city.as_deref(), units)
        .await?;
    Ok(Json(weather))
}

/// Daily forecast summaries (up to 5 days)
///
/// GET /api/v1/weather/forecast?lat=51.5&lon=-0.12&days=3
#[utoipa::path(
    get,
    path = "/api/v1/weather/forecast",
    tag = "weather",
    params(
        ("lat" = Option<f64>, Query, description = "Latitude, requires lon"),
        ("lon" = Option<f64>, Query, description = "Longitude, requires lat"),
        ("city" = Option<String>, Query, description = "City name, instead of lat/lon"),
        ("days" = Option<u8>, Query, description = "Number of days, 1 to 5 (default 5)"),
        ("units" = Option<String>, Query, description = "metric or imperial"),
    ),
    responses(
        (status = 200, body = Forecast),
        (status = 400, body = crate::error::ErrorResponse),
        (status = 502, body = crate::error::ErrorResponse),
    )
)]
pub async fn get_weather_forecast(
    State(state): State<AppState>,
    query: ValidatedQuery,
) -> Result<Json<Forecast>, WeatherError> {
    let units = query.units.unwrap_or(state.config.units);

    let forecast = state
        .weather_service
        .get_weather_forecast(query.lat, query.lon, query.city.as_deref(), query.days, units)
        .await?;
    Ok(Json(forecast))
}
