use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body returned for every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

/// Errors that know which HTTP status and machine-readable code they map to
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    /// Stable code for programmatic handling (e.g. "MISSING_LOCATION")
    fn error_code(&self) -> &'static str;
}

/// Render any HttpError as a JSON error response
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();
    let message = err.to_string();

    if status.is_server_error() {
        tracing::error!(error = %message, status = %status, code, "Request failed");
    } else {
        tracing::warn!(error = %message, status = %status, code, "Request rejected");
    }

    (status, Json(ErrorResponse::with_code(message, code))).into_response()
}

/// Implement IntoResponse for an HttpError type
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

/// Failure outcomes of the weather lookup chain.
///
/// Each variant stays distinct all the way to the HTTP boundary so that input
/// errors, provider outages and provider payload problems get different
/// status codes.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("No location supplied: provide both lat and lon, or a city")]
    MissingLocation,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Weather provider unavailable: {message}")]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed weather provider response: {0}")]
    MalformedUpstreamResponse(String),
}

impl WeatherError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            status: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingLocation | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::MalformedUpstreamResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingLocation => "MISSING_LOCATION",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            Self::MalformedUpstreamResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
        }
    }
}

impl_into_response!(WeatherError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_map_to_bad_request() {
        assert_eq!(
            WeatherError::MissingLocation.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WeatherError::InvalidRequest("days".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_errors_map_to_server_side_statuses() {
        let unavailable = WeatherError::upstream("timed out");
        assert_eq!(unavailable.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(unavailable.error_code(), "UPSTREAM_UNAVAILABLE");

        let malformed = WeatherError::MalformedUpstreamResponse("missing main.temp".into());
        assert_eq!(malformed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(malformed.error_code(), "MALFORMED_UPSTREAM_RESPONSE");
    }

    #[test]
    fn test_error_response_serializes_code() {
        let body = serde_json::to_value(ErrorResponse::with_code("nope", "MISSING_LOCATION"))
            .unwrap();
        assert_eq!(body["error"], "nope");
        assert_eq!(body["code"], "MISSING_LOCATION");
    }
}
