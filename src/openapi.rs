use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::weather::handlers::{self, HealthResponse};
use crate::weather::models::{Coordinates, CurrentWeather, Forecast, ForecastDay, Units};

/// OpenAPI documentation for the weather proxy
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Proxy API",
        version = "1.0.0",
        description = "Cached, normalized OpenWeatherMap current conditions and daily forecasts.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(handlers::get_current_weather, handlers::get_weather_forecast),
    tags(
        (name = "weather", description = "Current weather and daily forecasts")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Units,
            Coordinates,
            CurrentWeather,
            ForecastDay,
            Forecast,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
