pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod weather;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::weather::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub config: Arc<AppConfig>,
}
