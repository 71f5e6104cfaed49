use axum::{middleware, routing::get, Extension, Router};

use crate::middleware::{require_api_key, ClientApiKey};
use crate::openapi::swagger_ui;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes (protected by API key auth when configured)
fn weather_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .route(
            "/weather/current",
            get(weather_handlers::get_current_weather),
        )
        .route(
            "/weather/forecast",
            get(weather_handlers::get_weather_forecast),
        )
        .layer(middleware::from_fn(require_api_key))
        .layer(Extension(ClientApiKey(api_key)))
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    let api_key = state.config.api_key.clone();
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", weather_routes(api_key))
        .merge(swagger_ui())
        .with_state(state)
}
